extern crate iron;
extern crate router;
extern crate logger;
extern crate env_logger;
extern crate url;
extern crate serde;
extern crate thiserror;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate serde_json;
#[cfg(test)]
extern crate iron_test;

mod config;
mod error;
mod model;
mod store;
mod handlers;
mod routes;

use std::process;

use iron::Iron;
use logger::Logger;

use config::Config;
use store::PostStore;

// RUST_LOG=info,logger=info posts_backend
fn main() {
    if let Err(e) = env_logger::init() {
        eprintln!("could not initialise logging: {}", e);
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };
    let addr = match config.socket_addr() {
        Ok(addr) => addr,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    let (logger_before, logger_after) = Logger::new(None);

    let mut chain = routes::chain(PostStore::seeded());
    chain.link_before(logger_before); // Should be first!
    chain.link_after(logger_after); // Should be last!

    info!("serving posts on {}", addr);
    if let Err(e) = Iron::new(chain).http(addr) {
        error!("could not start server on {}: {}", addr, e);
        process::exit(1);
    }
}
