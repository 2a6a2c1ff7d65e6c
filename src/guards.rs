use actix_web::guard::GuardContext;
use actix_web::web;

use crate::AppState;

pub const ADMIN_KEY_HEADER: &str = "X-Admin-Key";

/// Passes requests carrying the configured admin key. Without a configured
/// key nothing passes.
pub fn admin_key_guard(ctx: &GuardContext) -> bool {
    let Some(admin_key) = ctx
        .app_data::<web::Data<AppState>>()
        .and_then(|state| state.admin_key.as_deref())
    else {
        return false;
    };

    ctx.head()
        .headers()
        .get(ADMIN_KEY_HEADER)
        .is_some_and(|it| it.as_bytes() == admin_key.as_bytes())
}
