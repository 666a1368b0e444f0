//! Selection Tests — oldest-first order, issue width, FU contention.

use crate::common::builders::InstBuilder;
use crate::common::harness::IqBench;
use o3sim_core::common::types::OpClass;
use o3sim_core::config::{Config, FuPoolConfig, FuUnitConfig, IqConfig, OpLatencyConfig};

fn width_limited(width: usize) -> Config {
    Config {
        iq: IqConfig {
            issue_width: width,
            ..Default::default()
        },
        ..Default::default()
    }
}

/// One ALU, one multiplier, generous width: selection order is decided by
/// age alone.
fn one_of_each() -> Config {
    Config {
        fu_pool: FuPoolConfig {
            units: vec![
                FuUnitConfig {
                    count: 1,
                    op_classes: vec![OpClass::IntAlu],
                },
                FuUnitConfig {
                    count: 1,
                    op_classes: vec![OpClass::IntMult],
                },
            ],
            latencies: vec![
                OpLatencyConfig {
                    op_class: OpClass::IntAlu,
                    latency: 0,
                    pipelined: true,
                },
                OpLatencyConfig {
                    op_class: OpClass::IntMult,
                    latency: 3,
                    pipelined: true,
                },
            ],
        },
        ..Default::default()
    }
}

#[test]
fn issue_count_never_exceeds_width() {
    let mut bench = IqBench::new(&width_limited(2));
    for seq in 1..=4 {
        bench.iq.insert(InstBuilder::new(seq).build());
    }

    let bundle = bench.tick();
    assert_eq!(IqBench::seqs(&bundle), vec![1, 2], "width caps the bundle");
    let bundle = bench.tick();
    assert_eq!(IqBench::seqs(&bundle), vec![3, 4]);
}

#[test]
fn oldest_ready_instructions_win_across_classes() {
    let mut bench = IqBench::new(&width_limited(2));
    // Three ready instructions, width two: the two globally oldest go.
    bench
        .iq
        .insert(InstBuilder::new(5).op(OpClass::IntMult).dests(&[3]).build());
    bench.iq.insert(InstBuilder::new(6).dests(&[4]).build());
    bench.iq.insert(InstBuilder::new(7).dests(&[5]).build());

    bench.tick();
    assert_eq!(bench.iq.stats.insts_issued, 2);
    assert_eq!(
        bench.iq.stats.insts_issued_per_class[OpClass::IntMult.index()],
        1
    );
    assert_eq!(
        bench.iq.stats.insts_issued_per_class[OpClass::IntAlu.index()],
        1,
        "sn 6, not sn 7, accompanies the multiply"
    );
}

#[test]
fn busy_unit_lets_younger_class_proceed() {
    let mut bench = IqBench::new(&one_of_each());
    let m1 = InstBuilder::new(1).op(OpClass::IntMult).dests(&[3]).build();
    let m2 = InstBuilder::new(2).op(OpClass::IntMult).dests(&[4]).build();
    let alu = InstBuilder::new(3).dests(&[5]).build();
    bench.iq.insert(m1.clone());
    bench.iq.insert(m2.clone());
    bench.iq.insert(alu.clone());

    bench.tick();
    assert!(m1.is_issued());
    assert!(!m2.is_issued(), "single multiplier is taken this cycle");
    assert!(alu.is_issued(), "younger ALU op proceeds around the stall");
    assert!(bench.iq.stats.fu_busy[OpClass::IntMult.index()] > 0);

    // The pipelined multiplier accepts the second multiply next cycle.
    bench.tick();
    assert!(m2.is_issued());
}

#[test]
fn unpipelined_unit_blocks_until_completion() {
    let mut bench = IqBench::with_defaults();
    let d1 = InstBuilder::new(1).op(OpClass::IntDiv).dests(&[3]).build();
    let d2 = InstBuilder::new(2).op(OpClass::IntDiv).dests(&[4]).build();
    bench.iq.insert(d1.clone());
    bench.iq.insert(d2.clone());

    // Divide is 12 cycles, not pipelined, one unit: sn 2 waits them out.
    let bundles = bench.tick_n(12);
    assert!(d1.is_issued());
    assert!(!d2.is_issued());
    assert_eq!(IqBench::seqs(&bundles[11]), Vec::<u64>::new());

    let bundle12 = bench.tick();
    assert_eq!(IqBench::seqs(&bundle12), vec![1]);
    assert!(d2.is_issued(), "unit freed by sn 1's completion");
}

#[test]
fn class_with_no_unit_issues_with_default_timing() {
    // A pool with only an ALU: Misc ops have no capable unit but still go.
    let config = Config {
        fu_pool: FuPoolConfig {
            units: vec![FuUnitConfig {
                count: 1,
                op_classes: vec![OpClass::IntAlu],
            }],
            latencies: vec![OpLatencyConfig {
                op_class: OpClass::IntAlu,
                latency: 0,
                pipelined: true,
            }],
        },
        ..Default::default()
    };
    let mut bench = IqBench::new(&config);
    let misc = InstBuilder::new(1).op(OpClass::Misc).build();
    bench.iq.insert(misc.clone());

    bench.tick();
    assert!(misc.is_issued());
    let bundle1 = bench.tick();
    assert_eq!(IqBench::seqs(&bundle1), vec![1], "default 1-cycle latency");
}
