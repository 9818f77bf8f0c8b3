use axum::{routing::post, Router};

use crate::{controllers::alerts_controller, AppState};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router.route("/api/alerts", post(alerts_controller::post_create_alert))
}
