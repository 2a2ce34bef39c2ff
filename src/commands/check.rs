//! Check command implementation.
//!
//! Validates system requirements and configuration.

use crate::config::{validate_effective_config, Config};
use crate::process::{collect_proc_entries, read_process_name, ProcEntry};
use crate::sampler::{sample_process, SampleOutcome};
use crate::startup_checks::validate_requirements;

/// Validates system requirements and configuration.
pub fn command_check(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 oom-watch - System Check");
    println!("===========================");

    let mut all_ok = true;
    let proc_root = config.proc_root();

    println!("\n📁 Checking {}...", proc_root.display());
    match validate_requirements(proc_root) {
        Ok(()) => {
            let entries = collect_proc_entries(proc_root);
            println!("   ✅ Can read {} process entries", entries.len());
        }
        Err(e) => {
            println!("   ❌ {}", e);
            all_ok = false;
        }
    }

    if all_ok {
        println!("\n💾 Sampling this process...");
        let own = ProcEntry::new(proc_root, std::process::id());
        match read_process_name(&own.proc_path) {
            Ok(name) => match sample_process(&own, &name) {
                Ok(SampleOutcome::Sample(s)) => {
                    println!(
                        "   ✅ {} (PID {}): VMS={}MB RSS={}MB USS={}MB oom_score={} oom_score_adj={}",
                        s.name,
                        s.pid,
                        s.memory.vms / 1024 / 1024,
                        s.memory.rss / 1024 / 1024,
                        s.memory.uss / 1024 / 1024,
                        s.oom.oom_score,
                        s.oom.oom_score_adj
                    );
                }
                Ok(outcome) => {
                    println!("   ⚠️  Own process not sampled: {:?}", outcome);
                }
                Err(e) => {
                    println!("   ❌ Sampling failed: {}", e);
                    all_ok = false;
                }
            },
            Err(e) => {
                println!("   ⚠️  Own process not visible under {}: {}", proc_root.display(), e);
            }
        }
    }

    println!("\n⚙️  Checking configuration...");
    match validate_effective_config(config) {
        Ok(_) => {
            println!("   ✅ Configuration is valid");
            println!("   👀 Watching: {}", config.watch_list().names().join(", "));
        }
        Err(e) => {
            println!("   ❌ Configuration invalid: {}", e);
            all_ok = false;
        }
    }

    println!("\n📋 Summary:");
    if all_ok {
        println!("   ✅ All checks passed - system is ready");
        Ok(())
    } else {
        println!("   ❌ Some checks failed - please review warnings");
        Err("system check failed".into())
    }
}
