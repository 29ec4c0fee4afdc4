use std::io::{self, Write};
use std::process;

use vecadd_engine::app;
use vecadd_engine::gpu::runtime::logging;
use vecadd_engine::ComputeConfig;

fn main() {
    logging::init();

    let config = ComputeConfig::default();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Err(e) = app::run(&config, &mut out) {
        let _ = out.flush();
        eprintln!("error [{}]: {}", e.stage(), e);
        process::exit(1);
    }
}
