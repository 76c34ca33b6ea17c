use depth_ladder::{build_view, DepthSource, LadderParams, RenderRow, SimulatedBook};
use log::info;
use rust_decimal_macros::dec;
use std::{thread, time::Duration};

const PAIR: &str = "ETHUSDT";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("\n═══════════════════════════════════════════════════════");
    println!("        DEPTH LADDER DEMO ({PAIR}, simulated book)");
    println!("═══════════════════════════════════════════════════════\n");

    let mut book = SimulatedBook::with_seed(2024, 500);

    for (round, step) in [dec!(0.01), dec!(0.1), dec!(1), dec!(5)].into_iter().enumerate() {
        let params = LadderParams {
            step,
            price_precision: 2,
            quantity_precision: 3,
            rows: 8,
        };

        let snapshot = match book.fetch(PAIR) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                eprintln!("fetch failed: {e}");
                continue;
            }
        };
        info!(
            "round {}: {} bids / {} asks raw",
            round + 1,
            snapshot.bids.len(),
            snapshot.asks.len()
        );

        match build_view(&snapshot, &params) {
            Ok(view) => {
                println!("📊 Round {} | step {step}", round + 1);
                println!("───────────────────────────────────────────────────────");
                for row in view.asks.iter().rev() {
                    print_row(row, "ASK");
                }
                println!(
                    "          ── mid {} ──",
                    view.mid_price.as_deref().unwrap_or("--")
                );
                for row in &view.bids {
                    print_row(row, "BID");
                }
                println!();
            }
            Err(e) => eprintln!("aggregation failed: {e}"),
        }

        thread::sleep(Duration::from_millis(500));
    }
}

fn print_row(row: &RenderRow, side: &str) {
    let bar_len = (row.style.fill_percent / 5.0).round() as usize;
    let marker = if row.style.is_max { " ◀ max" } else { "" };
    println!(
        "  {side} {:>12} │ {:>10} │ {:<20}{marker}",
        row.price,
        row.quantity,
        "█".repeat(bar_len)
    );
}
