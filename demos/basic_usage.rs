// ============================================================================
// Basic Usage Example
// ============================================================================

use qc_engine::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

fn main() {
    #[cfg(feature = "logging")]
    qc_engine::utils::init_tracing(tracing::Level::DEBUG).unwrap();

    println!("=== QC Engine Example ===\n");

    let technicians = HashMap::from([
        (ActorId(1), "A. Rivera".to_string()),
        (ActorId(2), "K. Osei".to_string()),
    ]);

    let service = QcServiceBuilder::new()
        .with_event_handler(Arc::new(LoggingEventHandler))
        .with_actor_directory(Arc::new(technicians))
        .build()
        .unwrap();

    // Target 100, control limits at ±3 SD (SD = 10), spec limits at ±20
    let chart = service
        .create_chart(
            ChartRequest::new("Cholesterol Level 1", MethodId(1))
                .with_instrument(InstrumentId(7))
                .with_control_limits(Decimal::from(100), Decimal::from(130), Decimal::from(70))
                .with_spec_limits(Decimal::from(120), Decimal::from(80)),
        )
        .unwrap();

    println!("Created chart {}\n", chart);

    println!("Recording measurements...");
    let readings = ["101.2", "98.7", "104.9", "122.1", "123.4", "99.8", "135.0", "100.3"];
    for (i, reading) in readings.iter().enumerate() {
        let actor = ActorId(1 + (i as u64 % 2));
        let outcome = service
            .add_data_point(
                chart,
                DataPointRequest::new(reading.parse().unwrap()).with_lot(LotId(2024)),
                actor,
            )
            .unwrap();

        if outcome.violation {
            println!("  {:>6} -> VIOLATION [{}]", reading, outcome.rules);
        } else {
            println!("  {:>6} -> ok", reading);
        }
    }

    let stats = service.get_statistics(chart).unwrap();
    println!("\n=== Statistics: {} ===", stats.chart_name);
    println!("Points:      {}", stats.total_points);
    println!("Mean:        {}", stats.mean);
    println!("SD:          {}", stats.sd);
    println!("Cpk:         {}", stats.cpk);
    println!("Violations:  {}", stats.violation_count);
    println!("In control:  {}", stats.in_control);

    let report = service.get_chart_report(chart).unwrap();
    println!("\n=== Flagged points ===");
    for view in report.violations() {
        println!(
            "  {} by {} [{}]",
            view.point.value,
            view.measured_by_name.as_deref().unwrap_or("unknown"),
            view.point.rules()
        );
    }

    println!(
        "\nViolations in the last 7 days: {}",
        service.count_recent_violations(None).unwrap()
    );
}
