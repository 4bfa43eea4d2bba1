//! Static file serving module
//!
//! Resolves request paths against the site root and reads the matching file.

use crate::handler::router::RequestContext;
use crate::http::{self, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use tokio::fs;

/// Serve a request path from the site root
pub async fn serve(
    ctx: &RequestContext<'_>,
    root: &str,
    index_files: &[String],
) -> Response<Full<Bytes>> {
    match load_from_root(root, ctx.path, index_files).await {
        Some((content, content_type)) => {
            http::response::build_file_response(content, content_type, ctx.is_head)
        }
        None => http::build_404_response(),
    }
}

/// Resolve a request path to a file under `root` and read it.
///
/// Returns `None` when the path does not lead to a readable file inside the
/// root: missing file, directory without an index file, or a traversal
/// attempt that would escape the root.
pub async fn load_from_root(
    root: &str,
    path: &str,
    index_files: &[String],
) -> Option<(Vec<u8>, &'static str)> {
    // Remove leading slash and literal ".." segments up front
    let clean_path = path.trim_start_matches('/').replace("..", "");

    let mut file_path = Path::new(root).join(&clean_path);

    let root_canonical = match Path::new(root).canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!("Site root not found or inaccessible '{root}': {e}"));
            return None;
        }
    };

    // Directory requests fall back to the configured index files
    if file_path.is_dir() || clean_path.is_empty() || clean_path.ends_with('/') {
        for index_file in index_files {
            let index_path = file_path.join(index_file);
            if index_path.is_file() {
                file_path = index_path;
                break;
            }
        }
    }

    // A path that fails to canonicalize is an ordinary 404
    let Ok(file_path_canonical) = file_path.canonicalize() else {
        return None;
    };

    // Symlinks and anything the cleanup above missed are caught here: the
    // resolved path must still sit under the resolved root
    if !file_path_canonical.starts_with(&root_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            path,
            file_path_canonical.display()
        ));
        return None;
    }

    let content = match fs::read(&file_path_canonical).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {}",
                file_path_canonical.display(),
                e
            ));
            return None;
        }
    };

    let content_type =
        mime::content_type_for(file_path_canonical.extension().and_then(|e| e.to_str()));

    Some((content, content_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;
    use std::path::PathBuf;

    struct SiteDir {
        base: PathBuf,
        root: PathBuf,
    }

    impl SiteDir {
        /// Lay out a site under a unique temp directory:
        /// base/secret.txt sits OUTSIDE the served root
        fn new(name: &str) -> Self {
            let base = std::env::temp_dir().join(format!(
                "freshserve-{name}-{}",
                std::process::id()
            ));
            let root = base.join("site");
            std_fs::create_dir_all(root.join("assets")).unwrap();
            std_fs::write(root.join("index.html"), b"<h1>home</h1>").unwrap();
            std_fs::write(root.join("assets/app.css"), b"body { margin: 0 }").unwrap();
            std_fs::write(base.join("secret.txt"), b"outside the root").unwrap();
            Self { base, root }
        }

        fn root(&self) -> &str {
            self.root.to_str().unwrap()
        }
    }

    impl Drop for SiteDir {
        fn drop(&mut self) {
            let _ = std_fs::remove_dir_all(&self.base);
        }
    }

    fn index_files() -> Vec<String> {
        vec!["index.html".to_string(), "index.htm".to_string()]
    }

    #[tokio::test]
    async fn serves_existing_file() {
        let site = SiteDir::new("existing");
        let (content, content_type) =
            load_from_root(site.root(), "/assets/app.css", &index_files())
                .await
                .unwrap();
        assert_eq!(content, b"body { margin: 0 }");
        assert_eq!(content_type, "text/css");
    }

    #[tokio::test]
    async fn root_path_falls_back_to_index() {
        let site = SiteDir::new("rootpath");
        let (content, content_type) = load_from_root(site.root(), "/", &index_files())
            .await
            .unwrap();
        assert_eq!(content, b"<h1>home</h1>");
        assert_eq!(content_type, "text/html; charset=utf-8");
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let site = SiteDir::new("missing");
        assert!(
            load_from_root(site.root(), "/does-not-exist.html", &index_files())
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn directory_without_index_is_not_found() {
        let site = SiteDir::new("noindex");
        assert!(load_from_root(site.root(), "/assets/", &index_files())
            .await
            .is_none());
    }

    #[tokio::test]
    async fn dot_dot_cannot_escape_root() {
        let site = SiteDir::new("dotdot");
        assert!(load_from_root(site.root(), "/../secret.txt", &index_files())
            .await
            .is_none());
        assert!(
            load_from_root(site.root(), "/assets/../../secret.txt", &index_files())
                .await
                .is_none()
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn symlink_out_of_root_is_blocked() {
        let site = SiteDir::new("symlink");
        std::os::unix::fs::symlink(&site.base, site.root.join("up")).unwrap();
        assert!(
            load_from_root(site.root(), "/up/secret.txt", &index_files())
                .await
                .is_none()
        );
    }
}
