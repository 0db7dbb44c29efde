use std::path::Path;

/// Renders a path as an absolute string for log and error messages, falling
/// back to the raw path when the filesystem cannot resolve it (e.g. the path
/// does not exist yet).
pub trait BestEffortPathExt {
    fn best_effort_path_display(&self) -> String;
}

impl<T: AsRef<Path>> BestEffortPathExt for T {
    fn best_effort_path_display(&self) -> String {
        let path = self.as_ref();
        match path.canonicalize() {
            Ok(canonical) => canonical.display().to_string(),
            Err(_) => std::env::current_dir()
                .map(|current_dir| current_dir.join(path))
                .unwrap_or_else(|_| path.to_path_buf())
                .display()
                .to_string(),
        }
    }
}
