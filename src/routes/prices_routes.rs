use axum::{routing::get, Router};

use crate::{controllers::prices_controller, AppState};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router.route("/api/prices/hourly", get(prices_controller::get_hourly_prices))
}
