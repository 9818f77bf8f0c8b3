use axum::{routing::get, Router};

use crate::{controllers::swap_controller, AppState};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router.route("/api/swap/rate", get(swap_controller::get_swap_rate))
}
