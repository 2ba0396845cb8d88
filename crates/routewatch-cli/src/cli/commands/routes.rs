//! `routewatch routes` – list configured routes.

use routewatch_core::config::RouteWatchConfig;

pub fn run_routes(cfg: &RouteWatchConfig) {
    println!("{:<32} {:<22} {}", "NAME", "FROM", "TO");
    for r in &cfg.routes {
        println!("{:<32} {:<22} {}", r.name, r.from_coords, r.to_coords);
    }
}
