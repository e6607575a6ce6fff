//! `rsdados route` — Show the routing decision without calling any tool.

use rsdados_agent::IntentRouter;

pub fn run(question: String) -> rsdados_core::Result<()> {
    let router = IntentRouter::default();
    for capability in router.route(&question) {
        println!("{capability}");
    }
    Ok(())
}
