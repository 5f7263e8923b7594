use datefill_core::config::ResolvedConfig;
use datefill_core::Interpolator;

use crate::EvalArgs;

pub fn run(rc: &ResolvedConfig, args: &EvalArgs) -> i32 {
    let reference = args.at.unwrap_or_else(|| rc.options.clock.now());

    match Interpolator::new(rc.options.clone()).interpolate_str(&args.text, reference) {
        Ok(out) => {
            println!("{out}");
            0
        }
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    }
}
