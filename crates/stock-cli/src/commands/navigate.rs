//! 화면 이동 (`open <path>`).

use anyhow::Result;

use crate::guard::Navigation;
use crate::session::SessionStore;

/// 저장된 세션의 역할로 화면 이동을 판단합니다.
pub fn open(store: &SessionStore, path: &str) -> Result<String> {
    let role = store.load()?.map(|s| s.role);
    let mut navigation = Navigation::begin(path);
    let outcome = navigation.resolve(role);

    tracing::debug!(path, state = ?navigation.state, "Navigation resolved");

    Ok(outcome.to_string())
}
