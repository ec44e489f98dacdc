/// Worker selection walkthrough
///
/// Demonstrates:
/// 1. Building a router from a validated configuration
/// 2. Scoring a small roster against a job
/// 3. A VRF-seeded selection with its audit trace
/// 4. Committing the winner's quota cost and rolling the epoch
///
/// Run with: cargo run --example assign_job
use meridian_quota::QuotaTracker;
use meridian_router::{AutoSelectionRouter, SelectionConfig};
use meridian_types::{JobRequest, PerformanceSnapshot, WorkerAddress, WorkerProfile};
use std::collections::HashMap;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    println!("🚀 Meridian worker selection walkthrough\n");

    let config = SelectionConfig::default();
    let tracker = QuotaTracker::new(config.max_quota)?;
    let router = AutoSelectionRouter::new(config)?;

    let workers = vec![
        WorkerProfile {
            address: WorkerAddress::from("0x1111"),
            accelerator_model: "NVIDIA RTX 4090".to_string(),
            memory_capacity: 24,
            core_count: 16,
            system_memory: 64,
            region: "us-west".to_string(),
        },
        WorkerProfile {
            address: WorkerAddress::from("0x2222"),
            accelerator_model: "NVIDIA A100".to_string(),
            memory_capacity: 80,
            core_count: 32,
            system_memory: 128,
            region: "us-east".to_string(),
        },
    ];

    let job = JobRequest::new("NVIDIA RTX 4090", 24).with_region("us-west");

    let mut stats = HashMap::new();
    stats.insert(
        WorkerAddress::from("0x1111"),
        PerformanceSnapshot::new(0.95, 0.98, 0.99),
    );
    stats.insert(
        WorkerAddress::from("0x2222"),
        PerformanceSnapshot::new(0.97, 0.96, 0.98),
    );

    tracker.record(&WorkerAddress::from("0x1111"), 0.05).await?;
    tracker.record(&WorkerAddress::from("0x2222"), 0.08).await?;

    let quotas = tracker.snapshot().await;

    println!("📋 Ranked candidates:");
    for score in router.score_workers(&workers, &job, &stats, &quotas) {
        println!(
            "   {} suitability {:.3} performance {:.3} fairness {:.3} total {:.4}",
            score.worker.address, score.suitability, score.performance, score.fairness, score.total
        );
    }

    // In production this is the verified VRF hash for the job
    let vrf_output = blake3::hash(b"job-7f3a:epoch-0").as_bytes().to_vec();

    let (selected, trace) = router.select_traced(&workers, &job, &stats, &quotas, &vrf_output)?;

    match selected {
        Some(winner) => {
            println!("\n🎯 Selected worker: {}", winner.address);
            println!(
                "   {} / {} GB / {}",
                winner.accelerator_model, winner.memory_capacity, winner.region
            );

            tracker.try_record(quotas.version, &winner.address, 0.01).await?;
            println!("   Quota committed, ledger version {}", quotas.version + 1);
        }
        None => println!("\n⚠️ No eligible worker, job requeued for next epoch"),
    }

    println!("\n🔍 Audit trace:\n{}", trace.to_json()?);

    tracker.roll_epoch(1).await;
    println!("\n📊 Epoch rolled, quotas reset");

    Ok(())
}
