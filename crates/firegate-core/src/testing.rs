// Scripted in-memory portal for driving the state machine in tests.
//
// Each operation pops the next scripted result. An exhausted login or
// list script answers with a timeout; exhausted lock/unlock scripts
// succeed.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::future::{Future, ready};
use std::sync::Mutex;
use std::time::Duration;

use firegate_api::{DoorRecord, PortalPaths, SessionId};
use secrecy::SecretString;
use tokio::time::Instant;
use url::Url;

use crate::config::{
    Credentials, DEFAULT_AUTH_RETRY_DELAY, StateCodes, TlsVerification, WatchdogConfig,
};
use crate::model::DoorAction;
use crate::portal::DoorPortal;

type ApiResult<T> = Result<T, firegate_api::Error>;

pub(crate) const DOOR: &str = "FireDoor";

#[derive(Default)]
pub(crate) struct ScriptedPortal {
    logins: Mutex<VecDeque<ApiResult<SessionId>>>,
    lists: Mutex<VecDeque<ApiResult<Vec<DoorRecord>>>>,
    unlocks: Mutex<VecDeque<ApiResult<()>>>,
    locks: Mutex<VecDeque<ApiResult<()>>>,
    login_times: Mutex<Vec<Instant>>,
    actions: Mutex<Vec<DoorAction>>,
}

impl ScriptedPortal {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_login(&self, result: ApiResult<SessionId>) {
        self.logins.lock().unwrap().push_back(result);
    }

    pub(crate) fn push_list(&self, result: ApiResult<Vec<DoorRecord>>) {
        self.lists.lock().unwrap().push_back(result);
    }

    /// Script a list response where the watched door reports `code`.
    pub(crate) fn push_door_state(&self, code: i64) {
        self.push_list(Ok(vec![
            DoorRecord::new("Lobby", 0),
            DoorRecord::new(DOOR, code),
        ]));
    }

    pub(crate) fn push_unlock(&self, result: ApiResult<()>) {
        self.unlocks.lock().unwrap().push_back(result);
    }

    pub(crate) fn push_lock(&self, result: ApiResult<()>) {
        self.locks.lock().unwrap().push_back(result);
    }

    pub(crate) fn login_times(&self) -> Vec<Instant> {
        self.login_times.lock().unwrap().clone()
    }

    /// Every lock/unlock attempted, successful or not, in order.
    pub(crate) fn actions(&self) -> Vec<DoorAction> {
        self.actions.lock().unwrap().clone()
    }
}

impl DoorPortal for ScriptedPortal {
    fn login(
        &self,
        _username: &str,
        _password_hash: &SecretString,
    ) -> impl Future<Output = ApiResult<SessionId>> + Send {
        self.login_times.lock().unwrap().push(Instant::now());
        let next = self.logins.lock().unwrap().pop_front();
        ready(next.unwrap_or_else(|| Err(transport_error())))
    }

    fn list_doors(
        &self,
        _session: &SessionId,
    ) -> impl Future<Output = ApiResult<Vec<DoorRecord>>> + Send {
        let next = self.lists.lock().unwrap().pop_front();
        ready(next.unwrap_or_else(|| Err(transport_error())))
    }

    fn unlock_all(&self, _session: &SessionId) -> impl Future<Output = ApiResult<()>> + Send {
        self.actions.lock().unwrap().push(DoorAction::UnlockAll);
        let next = self.unlocks.lock().unwrap().pop_front();
        ready(next.unwrap_or(Ok(())))
    }

    fn lock_all(&self, _session: &SessionId) -> impl Future<Output = ApiResult<()>> + Send {
        self.actions.lock().unwrap().push(DoorAction::LockAll);
        let next = self.locks.lock().unwrap().pop_front();
        ready(next.unwrap_or(Ok(())))
    }
}

pub(crate) fn transport_error() -> firegate_api::Error {
    firegate_api::Error::Timeout { endpoint: "auth" }
}

pub(crate) fn status_error(endpoint: &'static str, status: u16) -> firegate_api::Error {
    firegate_api::Error::Status {
        endpoint,
        status,
        body: String::new(),
    }
}

pub(crate) fn credentials() -> Credentials {
    Credentials {
        username: "operator".into(),
        password_hash: SecretString::from("ABCDEF".to_string()),
    }
}

pub(crate) fn config() -> WatchdogConfig {
    WatchdogConfig {
        portal_url: Url::parse("http://portal.test").unwrap(),
        paths: PortalPaths {
            auth: "/api/Authenticate".into(),
            door_get_list: "/api/Door/GetList".into(),
            door_unlock_all: "/api/Door/UnlockAll".into(),
            door_lock_all: "/api/Door/LockAll".into(),
        },
        credentials: credentials(),
        door_name: DOOR.into(),
        state_codes: StateCodes { open: 1, normal: 0 },
        poll_interval: Duration::from_secs(5),
        auth_retry_delay: DEFAULT_AUTH_RETRY_DELAY,
        tls: TlsVerification::SystemDefaults,
        timeout: Duration::from_secs(30),
    }
}
