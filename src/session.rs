use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

/// Хранилище bearer-токена. Клонируется дёшево, все клоны видят один токен.
/// Пишет в него только login; остальные только читают.
#[derive(Clone, Debug, Default)]
pub struct Session {
    inner: Arc<SessionInner>,
}

#[derive(Debug, Default)]
struct SessionInner {
    token: RwLock<Option<String>>,
    path: Option<PathBuf>,
}

impl Session {
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let session = Self::default();
        session.store(Some(token.into()));
        session
    }

    /// Поднимает токен, сохранённый прошлым запуском.
    /// Нет файла или он пустой - значит не залогинены.
    pub fn load(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let token = match fs::read_to_string(&path) {
            Ok(raw) => Some(raw.trim().to_string()).filter(|t| !t.is_empty()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(e),
        };
        debug!("session loaded from {} (authenticated: {})", path.display(), token.is_some());

        Ok(Self {
            inner: Arc::new(SessionInner {
                token: RwLock::new(token),
                path: Some(path),
            }),
        })
    }

    pub fn token(&self) -> Option<String> {
        self.inner
            .token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn set_token(&self, token: impl Into<String>) -> io::Result<()> {
        let token = token.into();
        if let Some(path) = &self.inner.path {
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                fs::create_dir_all(dir)?;
            }
            write_private(path, &token)?;
        }
        self.store(Some(token));
        Ok(())
    }

    pub fn clear(&self) -> io::Result<()> {
        self.store(None);
        if let Some(path) = &self.inner.path {
            match fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Заголовок Authorization, если токен есть. Без токена - пустой набор, не ошибка.
    pub fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(token) = self.token() {
            match HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => warn!("stored token contains invalid header characters, sending request without it"),
            }
        }
        headers
    }

    fn store(&self, token: Option<String>) {
        *self
            .inner
            .token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = token;
    }
}

// Токен читает только владелец файла
fn write_private(path: &Path, token: &str) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    std::os::unix::fs::OpenOptionsExt::mode(&mut options, 0o600);

    let mut file = options.open(path)?;
    // mode действует только при создании, старый файл мог быть 0644
    #[cfg(unix)]
    file.set_permissions(std::os::unix::fs::PermissionsExt::from_mode(0o600))?;
    file.write_all(token.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_no_token_gives_empty_headers() {
        let session = Session::in_memory();
        assert!(!session.is_authenticated());
        assert!(session.auth_headers().is_empty());
    }

    #[test]
    fn test_token_becomes_bearer_header() {
        let session = Session::with_token("abc123");
        let headers = session.auth_headers();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer abc123");
    }

    #[test]
    fn test_clones_share_token() {
        let session = Session::in_memory();
        let reader = session.clone();
        session.set_token("shared").unwrap();
        assert_eq!(reader.token().as_deref(), Some("shared"));
    }

    #[test]
    fn test_token_persists_between_loads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("token");

        let session = Session::load(&path).unwrap();
        assert!(!session.is_authenticated());
        session.set_token("persisted").unwrap();

        let reloaded = Session::load(&path).unwrap();
        assert_eq!(reloaded.token().as_deref(), Some("persisted"));

        reloaded.clear().unwrap();
        assert!(!path.exists());
        assert!(!Session::load(&path).unwrap().is_authenticated());
    }

    #[cfg(unix)]
    #[test]
    fn test_token_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("token");
        // файл от старой версии с правами по умолчанию
        fs::write(&path, "old").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        Session::load(&path).unwrap().set_token("secret").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o077, 0, "token file mode {:o}", mode);
        assert_eq!(fs::read_to_string(&path).unwrap(), "secret");

        let fresh = dir.path().join("fresh");
        Session::load(&fresh).unwrap().set_token("secret").unwrap();
        assert_eq!(fs::metadata(&fresh).unwrap().permissions().mode() & 0o077, 0);
    }

    #[test]
    fn test_blank_file_means_unauthenticated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("token");
        fs::write(&path, "  \n").unwrap();
        assert!(!Session::load(&path).unwrap().is_authenticated());
    }
}
