//! Mock session store for isolating session handling in tests.

use mockall::mock;

use crate::session::{Session, SessionResult, SessionStore};

mock! {
    pub SessionStorage {}

    impl SessionStore for SessionStorage {
        fn load(&self) -> SessionResult<Option<Session>>;
        fn save(&self, session: &Session) -> SessionResult<()>;
        fn clear(&self) -> SessionResult<()>;
    }
}
