//! Kernel command
//!
//! Prints the Gaussian kernel the blur stage would use.

use crate::KernelArgs;
use anyhow::{Context, Result};
use pixflow_ops::Kernel;

pub fn run(args: KernelArgs) -> Result<()> {
    let kernel = Kernel::gaussian(args.size, args.spread)
        .with_context(|| format!("Cannot build kernel size={} spread={}", args.size, args.spread))?;
    print!("{}", render(&kernel, args.precision));
    Ok(())
}

/// One row per line, followed by the weight sum.
fn render(kernel: &Kernel, precision: usize) -> String {
    let mut out = String::new();
    for row in kernel.weights().chunks(kernel.size()) {
        let cells: Vec<String> = row.iter().map(|w| format!("{:.*}", precision, w)).collect();
        out.push_str(&cells.join(" "));
        out.push('\n');
    }
    out.push_str(&format!(
        "size = {}, sum = {:.*}\n",
        kernel.size(),
        precision,
        kernel.sum()
    ));
    out
}
