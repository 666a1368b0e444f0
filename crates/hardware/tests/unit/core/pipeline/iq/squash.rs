//! Squash Tests — rollback of misspeculated instructions.

use crate::common::builders::InstBuilder;
use crate::common::harness::IqBench;
use o3sim_core::common::types::OpClass;
use o3sim_core::config::{Config, IqConfig};

#[test]
fn branch_mispredict_drops_younger_instructions() {
    let mut bench = IqBench::with_defaults();
    let entries = Config::default().iq.num_entries;

    // Thread 0 holds sns 10..=14; sn 11 is the mispredicted branch.
    for seq in 10..=14 {
        bench.iq.insert(InstBuilder::new(seq).dests(&[seq as usize]).build());
    }
    assert_eq!(bench.iq.get_count(0), 5);
    bench.send_squash(0, 11);

    let bundle = bench.tick();

    // Only the survivors issue; the three squashed sat in ready queues and
    // were skipped lazily at select time.
    assert_eq!(IqBench::seqs(&bundle), vec![10, 11]);
    assert_eq!(bench.iq.get_count(0), 2);
    assert_eq!(bench.iq.num_free_entries(), entries - 2);
    assert_eq!(bench.iq.stats.squashed_insts_examined, 3);
    assert_eq!(bench.iq.stats.squashed_insts_issued, 3);
}

#[test]
fn squash_unlinks_waiting_consumers() {
    let mut bench = IqBench::with_defaults();

    let mult = InstBuilder::new(20).op(OpClass::IntMult).dests(&[9]).build();
    bench.iq.insert(mult);
    bench.iq.insert(InstBuilder::new(21).srcs(&[9]).dests(&[10]).build());
    bench.iq.insert(InstBuilder::new(22).srcs(&[9, 9]).dests(&[11]).build());

    bench.tick();
    bench.send_squash(0, 20);
    bench.tick();
    assert_eq!(bench.iq.stats.squashed_insts_examined, 2);
    assert_eq!(
        bench.iq.stats.squashed_operands_examined, 3,
        "one operand for sn 21, two for sn 22"
    );

    // The multiply completes at cycle 3 into an empty dependency list.
    let bundle3 = bench.tick_n(2).pop().unwrap();
    assert_eq!(IqBench::seqs(&bundle3), vec![20]);
}

#[test]
fn insert_then_squash_restores_initial_state() {
    let mut bench = IqBench::with_defaults();
    let free_before = bench.iq.num_free_entries();

    bench.iq.insert(InstBuilder::new(30).srcs(&[3]).dests(&[4]).build());
    assert_eq!(bench.iq.num_free_entries(), free_before - 1);

    bench.send_squash(0, 29);
    bench.tick();

    assert_eq!(bench.iq.num_free_entries(), free_before);
    assert_eq!(bench.iq.get_count(0), 0);
    assert_eq!(bench.iq.count_insts(), 0);
    assert!(!bench.iq.has_ready_insts());
}

#[test]
fn squashed_completion_event_is_inert() {
    let mut bench = IqBench::with_defaults();

    let mult = InstBuilder::new(1).op(OpClass::IntMult).dests(&[7]).build();
    bench.iq.insert(mult.clone());
    bench.iq.insert(InstBuilder::new(2).srcs(&[7]).dests(&[8]).build());

    bench.tick();
    assert!(mult.is_issued());

    // Squash everything; the in-flight completion at cycle 3 must only
    // return its unit, not wake anyone or reach the bundle.
    bench.send_squash(0, 0);
    bench.tick();
    let bundles = bench.tick_n(4);
    assert!(bundles.iter().all(|b| b.is_empty()));
    assert_eq!(bench.iq.count_insts(), 0);
}

#[test]
fn bounded_squash_spreads_across_cycles() {
    let config = Config {
        iq: IqConfig {
            squash_width: 1,
            ..Default::default()
        },
        ..Default::default()
    };
    let mut bench = IqBench::new(&config);

    // Five waiters on a register nobody produces; none ever issue.
    for seq in 10..=14 {
        bench.iq.insert(InstBuilder::new(seq).srcs(&[3]).build());
    }
    bench.send_squash(0, 10);
    bench.tick();
    assert_eq!(bench.iq.stats.squashed_insts_examined, 1);
    assert!(bench.iq.is_squashing(0));

    bench.tick_n(3);
    assert_eq!(bench.iq.stats.squashed_insts_examined, 4);
    assert!(!bench.iq.is_squashing(0));
    assert_eq!(bench.iq.get_count(0), 1);
}

#[test]
fn squash_is_per_thread() {
    let config = Config {
        num_threads: 2,
        ..Default::default()
    };
    let mut bench = IqBench::new(&config);

    bench.iq.insert(InstBuilder::new(1).thread(0).srcs(&[3]).build());
    bench.iq.insert(InstBuilder::new(2).thread(1).srcs(&[3]).build());
    bench.send_squash(0, 0);
    bench.tick();

    assert_eq!(bench.iq.get_count(0), 0);
    assert_eq!(bench.iq.get_count(1), 1, "thread 1 is untouched");
}
