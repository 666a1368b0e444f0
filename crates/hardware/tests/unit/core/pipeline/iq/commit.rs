//! Commit Tests — releasing queue entries for retired instructions.

use crate::common::builders::InstBuilder;
use crate::common::harness::IqBench;

#[test]
fn commit_frees_entries_up_to_seq() {
    let mut bench = IqBench::with_defaults();
    let free_before = bench.iq.num_free_entries();

    for seq in 1..=4 {
        bench.iq.insert(InstBuilder::new(seq).dests(&[seq as usize]).build());
    }
    bench.tick();
    assert_eq!(bench.iq.get_count(0), 4, "issued instructions stay windowed");

    bench.send_commit(0, 2);
    bench.tick();
    assert_eq!(bench.iq.get_count(0), 2);
    assert_eq!(bench.iq.num_free_entries(), free_before - 2);

    bench.send_commit(0, 4);
    bench.tick();
    assert_eq!(bench.iq.get_count(0), 0);
    assert_eq!(bench.iq.num_free_entries(), free_before);
    assert_eq!(bench.iq.count_insts(), 0);
}

#[test]
fn commit_is_per_thread() {
    let config = o3sim_core::config::Config {
        num_threads: 2,
        ..Default::default()
    };
    let mut bench = IqBench::new(&config);
    bench.iq.insert(InstBuilder::new(1).thread(0).dests(&[5]).build());
    bench.iq.insert(InstBuilder::new(2).thread(1).dests(&[50]).build());
    bench.tick();

    bench.send_commit(0, 2);
    bench.tick();
    assert_eq!(bench.iq.get_count(0), 0);
    assert_eq!(bench.iq.get_count(1), 1, "thread 1's window is untouched");
}

#[test]
fn advance_tail_entries_release_at_commit() {
    let mut bench = IqBench::with_defaults();
    let free_before = bench.iq.num_free_entries();

    // A no-op consumed at rename: window and accounting only.
    bench.iq.advance_tail(InstBuilder::new(7).build());
    assert_eq!(bench.iq.num_free_entries(), free_before - 1);
    assert!(!bench.iq.has_ready_insts());

    bench.send_commit(0, 7);
    bench.tick();
    assert_eq!(bench.iq.num_free_entries(), free_before);
}
