//! Simulation statistics collection and reporting.
//!
//! This module tracks performance metrics for the instruction queue. It
//! provides:
//! 1. **Throughput:** Instructions added and issued, issue rate, per-op-class issue counts.
//! 2. **Squash accounting:** Instructions and operands examined and removed by squashes.
//! 3. **Occupancy:** Queue residency and issue-delay distributions, issued-per-cycle histogram.
//! 4. **FU contention:** Busy-unit rejections per op class and the FU busy rate.

use crate::common::types::OpClass;

/// Running min/max/mean accumulator for a sampled quantity.
#[derive(Debug, Clone, Copy, Default)]
pub struct Distribution {
    /// Number of recorded samples.
    pub count: u64,
    /// Sum of all samples.
    pub sum: u64,
    /// Smallest sample seen.
    pub min: u64,
    /// Largest sample seen.
    pub max: u64,
}

impl Distribution {
    /// Records one sample.
    pub fn record(&mut self, value: u64) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.count += 1;
        self.sum += value;
    }

    /// Arithmetic mean of the samples, or 0.0 with no samples.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum as f64 / self.count as f64
        }
    }
}

/// Instruction queue statistics.
#[derive(Debug, Clone, Default)]
pub struct IqStats {
    /// Simulated cycles the queue has been ticked.
    pub cycles: u64,

    /// Instructions inserted for scheduling.
    pub insts_added: u64,
    /// Non-speculative instructions inserted.
    pub non_spec_insts_added: u64,

    /// Instructions issued to function units.
    pub insts_issued: u64,
    /// Issued instructions broken out by op class.
    pub insts_issued_per_class: [u64; OpClass::COUNT],

    /// Squashed instructions that surfaced at the head of a ready queue
    /// and were skipped at select time.
    pub squashed_insts_issued: u64,
    /// Instructions examined by the squash engine.
    pub squashed_insts_examined: u64,
    /// Source operands examined while unlinking squashed instructions.
    pub squashed_operands_examined: u64,
    /// Non-speculative instructions dropped by a squash.
    pub squashed_non_spec_removed: u64,

    /// Cycles from dispatch to removal at commit.
    pub queue_residency: Distribution,
    /// Cycles from dispatch to issue.
    pub issue_delay: Distribution,
    /// Instructions issued per cycle.
    pub issued_per_cycle: Distribution,

    /// Select-time rejections because all capable units were busy,
    /// per op class.
    pub fu_busy: [u64; OpClass::COUNT],
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"issue"`, `"squash"`,
/// `"occupancy"`. Pass an empty slice to `print_sections` to print all
/// sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "issue", "squash", "occupancy"];

impl IqStats {
    /// Instructions issued per ticked cycle.
    pub fn issue_rate(&self) -> f64 {
        if self.cycles == 0 {
            0.0
        } else {
            self.insts_issued as f64 / self.cycles as f64
        }
    }

    /// Busy-unit rejections per issued instruction.
    pub fn fu_busy_rate(&self) -> f64 {
        let busy: u64 = self.fu_busy.iter().sum();
        if self.insts_issued == 0 {
            0.0
        } else {
            busy as f64 / self.insts_issued as f64
        }
    }

    /// Prints only the requested statistics sections to stdout.
    ///
    /// Each element of `sections` should be one of the names in
    /// [`STATS_SECTIONS`]. Pass an empty slice to print everything.
    pub fn print_sections(&self, sections: &[String]) {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);

        println!("\n==========================================================");
        println!("INSTRUCTION QUEUE STATISTICS");
        println!("==========================================================");

        if want("summary") {
            println!("sim_cycles               {}", self.cycles);
            println!("iq_insts_added           {}", self.insts_added);
            println!("iq_non_spec_added        {}", self.non_spec_insts_added);
            println!("iq_insts_issued          {}", self.insts_issued);
            println!("iq_issue_rate            {:.4}", self.issue_rate());
            println!("iq_fu_busy_rate          {:.4}", self.fu_busy_rate());
            println!("----------------------------------------------------------");
        }
        if want("issue") {
            println!("ISSUED BY OP CLASS");
            for class in OpClass::ALL {
                let issued = self.insts_issued_per_class[class.index()];
                let busy = self.fu_busy[class.index()];
                if issued > 0 || busy > 0 {
                    println!(
                        "  {:<10}  issued: {:<10} fu_busy: {}",
                        class.to_string(),
                        issued,
                        busy
                    );
                }
            }
            println!("----------------------------------------------------------");
        }
        if want("squash") {
            println!("SQUASH");
            println!("  insts_examined         {}", self.squashed_insts_examined);
            println!(
                "  operands_examined      {}",
                self.squashed_operands_examined
            );
            println!("  ready_skipped          {}", self.squashed_insts_issued);
            println!(
                "  non_spec_removed       {}",
                self.squashed_non_spec_removed
            );
            println!("----------------------------------------------------------");
        }
        if want("occupancy") {
            let dist = |d: &Distribution| {
                format!(
                    "mean {:.2}  min {}  max {}  samples {}",
                    d.mean(),
                    d.min,
                    d.max,
                    d.count
                )
            };
            println!("OCCUPANCY");
            println!("  queue_residency        {}", dist(&self.queue_residency));
            println!("  issue_delay            {}", dist(&self.issue_delay));
            println!("  issued_per_cycle       {}", dist(&self.issued_per_cycle));
        }
        println!("==========================================================");
    }

    /// Prints all statistics sections to stdout.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}
