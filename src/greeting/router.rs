//! The greeting router.

use crate::greeting::controllers::{creator_controller, hello_controller, name_controller};
use crate::service::WebRouter;

pub const ROUTER_NAME: &str = "MyFirstWebRouter";
pub const ROUTER_PATH: &str = "api";

pub fn greeting_router() -> WebRouter {
    WebRouter::new(ROUTER_NAME, ROUTER_PATH)
        .with_controller(name_controller())
        .with_controller(hello_controller())
        .with_controller(creator_controller())
}
