use anyhow::Result;
use colored::Colorize;
use std::io::Write;
use std::time::Duration;

use crate::tester::ScenarioResult;
use crate::util::report_timestamp;

#[allow(clippy::cast_precision_loss)]
fn success_rate(results: &[ScenarioResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let passed = results.iter().filter(|r| r.passed).count();
    (passed as f64 / results.len() as f64) * 100.0
}

pub fn generate_console_report(
    out: &mut impl Write,
    results: &[ScenarioResult],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Catalog Scenario Results".bright_cyan().bold())?;
    writeln!(out, "{}", "===========================".cyan())?;
    writeln!(out, "Generated: {}", report_timestamp())?;

    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();
    writeln!(out, "Total runs: {total}")?;
    writeln!(out, "Passed: {}", passed.to_string().green())?;
    writeln!(out, "Failed: {}", (total - passed).to_string().red())?;
    writeln!(out, "Success rate: {:.1}%", success_rate(results))?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for result in results {
        let status = if result.passed {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };
        writeln!(
            out,
            "{status} {} (seed {})",
            result.scenario_name.bold(),
            result.seed
        )?;
        writeln!(
            out,
            "   Iterations: {}/{} successful",
            result.successful_iterations, result.iterations_run
        )?;
        writeln!(out, "   Average time: {:?}", result.average_duration)?;
        if !result.failures.is_empty() {
            writeln!(out, "   Failures:")?;
            for failure in &result.failures {
                writeln!(out, "     • {}", failure.red())?;
            }
        }
        writeln!(out)?;
    }

    if let (Some(fastest), Some(slowest)) = (
        results.iter().min_by_key(|r| r.average_duration),
        results.iter().max_by_key(|r| r.average_duration),
    ) {
        writeln!(out, "{}", "⚡ Performance Summary".bright_yellow().bold())?;
        writeln!(out, "{}", "=====================".yellow())?;
        writeln!(
            out,
            "Fastest: {} ({:?})",
            fastest.scenario_name.green(),
            fastest.average_duration
        )?;
        writeln!(
            out,
            "Slowest: {} ({:?})",
            slowest.scenario_name.yellow(),
            slowest.average_duration
        )?;
    }
    Ok(())
}

pub fn generate_json_report(out: &mut impl Write, results: &[ScenarioResult]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, results)?;
    writeln!(out)?;
    Ok(())
}

pub fn generate_markdown_report(out: &mut impl Write, results: &[ScenarioResult]) -> Result<()> {
    writeln!(out, "# Floreria Catalog Scenario Results\n")?;
    writeln!(out, "_Generated {}_\n", report_timestamp())?;

    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();
    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Total runs**: {total}")?;
    writeln!(out, "- **Passed**: {passed}")?;
    writeln!(out, "- **Failed**: {}", total - passed)?;
    writeln!(out, "- **Success rate**: {:.1}%\n", success_rate(results))?;

    writeln!(out, "## Detailed Results\n")?;
    for result in results {
        let status = if result.passed { "✅" } else { "❌" };
        writeln!(out, "### {status} {} (seed {})\n", result.scenario_name, result.seed)?;
        writeln!(
            out,
            "- **Iterations**: {}/{} successful",
            result.successful_iterations, result.iterations_run
        )?;
        writeln!(out, "- **Average time**: {:?}", result.average_duration)?;
        if !result.failures.is_empty() {
            writeln!(out, "- **Failures**:")?;
            for failure in &result.failures {
                writeln!(out, "  - {failure}")?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(passed: bool) -> ScenarioResult {
        ScenarioResult {
            scenario_name: "modal-clamping".into(),
            seed: 7,
            passed,
            iterations_run: 2,
            successful_iterations: if passed { 2 } else { 1 },
            failures: if passed {
                Vec::new()
            } else {
                vec!["Iteration 2 (seed 8): cursor jumped".into()]
            },
            average_duration: Duration::from_micros(40),
        }
    }

    #[test]
    fn markdown_lists_failures() {
        let mut buf = Vec::new();
        generate_markdown_report(&mut buf, &[sample(true), sample(false)]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("- **Success rate**: 50.0%"));
        assert!(text.contains("  - Iteration 2 (seed 8): cursor jumped"));
    }

    #[test]
    fn json_report_is_an_array() {
        let mut buf = Vec::new();
        generate_json_report(&mut buf, &[sample(true)]).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(1));
        assert_eq!(value[0]["seed"], 7);
    }

    #[test]
    fn console_report_handles_empty_results() {
        let mut buf = Vec::new();
        generate_console_report(&mut buf, &[], Duration::ZERO).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Total runs: 0"));
        assert!(!text.contains("Performance Summary"));
    }
}
