pub mod alerts_controller;
pub mod prices_controller;
pub mod swap_controller;
