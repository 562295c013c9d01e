/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - tokens: TokenService, identities: IdentityLookup, policy: RolePolicy,
 *     guard: AccessGuard, downstream: DownstreamClient
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 * - 起動時に一度だけ組み立て、以後は読み取り専用
 */
use std::sync::Arc;

use crate::services::auth::{AccessGuard, IdentityLookup, RolePolicy, TokenService};
use crate::services::downstream::DownstreamClient;

#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenService>,
    pub identities: Arc<dyn IdentityLookup>,
    pub policy: Arc<RolePolicy>,
    pub guard: Arc<AccessGuard>,
    pub downstream: Arc<DownstreamClient>,
}

impl AppState {
    pub fn new(
        tokens: Arc<TokenService>,
        identities: Arc<dyn IdentityLookup>,
        policy: Arc<RolePolicy>,
        guard: Arc<AccessGuard>,
        downstream: Arc<DownstreamClient>,
    ) -> Self {
        Self {
            tokens,
            identities,
            policy,
            guard,
            downstream,
        }
    }
}
