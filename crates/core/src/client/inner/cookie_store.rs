use std::sync::{Arc, PoisonError};

use log::{error, warn};
use reqwest::{cookie::CookieStore, header::HeaderValue, Url};
use reqwest_cookie_store::CookieStoreMutex;

use crate::{model::StoreKey, persistence::SecurePersistentStore};

/// Cookie jar for the backend's credential cookies, mirrored into the
/// persistence provider under [StoreKey::Cookies].
pub struct CredentialJar {
    jar: Arc<CookieStoreMutex>,
    persistent_store: Option<Arc<dyn SecurePersistentStore>>,
}

impl CredentialJar {
    pub fn new(persistent_store: Option<Arc<dyn SecurePersistentStore>>) -> Self {
        let jar = match persistent_store.as_ref().map(|s| s.get(StoreKey::Cookies.into())) {
            Some(Some(bytes)) => cookie_store::serde::json::load(bytes.as_slice())
                .unwrap_or_else(|e| {
                    error!("Failed to load cookie jar: {e} - starting empty");
                    reqwest_cookie_store::CookieStore::default()
                }),
            Some(None) => reqwest_cookie_store::CookieStore::default(),
            None => {
                warn!("No persistence provider - cookies live for this process only");
                reqwest_cookie_store::CookieStore::default()
            }
        };

        Self {
            jar: Arc::new(CookieStoreMutex::new(jar)),
            persistent_store,
        }
    }

    /// Writes the jar through to the persistence provider, if there is one.
    pub fn save(&self) {
        let Some(store) = &self.persistent_store else {
            return;
        };

        let mut buffer = Vec::new();
        let jar = self.jar.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = cookie_store::serde::json::save(&jar, &mut buffer) {
            warn!("Failed to serialize cookie jar: {e}");
            return;
        }

        store.set(StoreKey::Cookies.into(), buffer)
    }

    /// Drops every cookie, in memory and on disk.
    pub fn clear(&self) {
        self.jar
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        if let Some(store) = &self.persistent_store {
            store.remove_entry(StoreKey::Cookies.into());
        }
    }
}

impl CookieStore for CredentialJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        CookieStore::set_cookies(self.jar.as_ref(), cookie_headers, url);
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        CookieStore::cookies(self.jar.as_ref(), url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn cookies_survive_a_new_jar() {
        let store = Arc::new(MemoryStore::new());
        let jar = CredentialJar::new(Some(store.clone()));
        let url: Url = "https://console.example.edu/user/login".parse().unwrap();

        let headers = [HeaderValue::from_static(
            "JSESSIONID=abc; Path=/; Expires=Fri, 31 Dec 9999 23:59:59 GMT",
        )];
        jar.set_cookies(&mut headers.iter(), &url);
        jar.save();

        let reopened = CredentialJar::new(Some(store.clone()));
        assert!(reopened.cookies(&url).is_some());

        reopened.clear();
        assert!(reopened.cookies(&url).is_none());
        assert_eq!(store.get("cookies".into()), None);
    }

    #[test]
    fn damaged_jar_starts_empty() {
        let store = Arc::new(MemoryStore::new());
        store.set("cookies".into(), b"\xff\xfe".to_vec());
        let jar = CredentialJar::new(Some(store));
        let url: Url = "https://console.example.edu/".parse().unwrap();
        assert!(jar.cookies(&url).is_none());
    }
}
