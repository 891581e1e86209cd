use crate::demo::build_shop;
use crate::dist::Distribution;
use crate::facility::Facility;
use crate::process::{ProcessSpec, State};
use crate::sim::{
    CustomerSpec, FacilityId, FacilitySpec, ProcessId, SEIZE_FACILITY_PRIO, ScenarioSpec, SimTime,
    Simulation,
};
use std::cell::RefCell;
use std::rc::Rc;

type ExitLog = Rc<RefCell<Vec<(ProcessId, SimTime)>>>;

/// 状态 0 申请设施，状态 1 记录离开时间
fn seize_once(facility: FacilityId, log: ExitLog) -> ProcessSpec {
    seize_with_priority(facility, SEIZE_FACILITY_PRIO, log)
}

fn seize_with_priority(facility: FacilityId, priority: i32, log: ExitLog) -> ProcessSpec {
    ProcessSpec::new(move |sim: &mut Simulation, me: ProcessId, state: State| match state {
        0 => sim
            .request_service(me, facility, 1, priority)
            .expect("seize"),
        _ => log.borrow_mut().push((me, sim.now())),
    })
}

fn fixed(d: f64) -> Distribution {
    Distribution::uniform(d, d).expect("fixed duration")
}

#[test]
fn single_slot_facility_with_two_contenders() {
    let mut sim = Simulation::with_seed(1);
    let fac = sim
        .add_facility(FacilityId(0), "desk", 1, fixed(4.0))
        .expect("facility");
    let log: ExitLog = Rc::default();

    let a = sim.create_process(seize_once(fac, Rc::clone(&log)));
    let b = sim.create_process_delayed(1.0, seize_once(fac, Rc::clone(&log)));

    let mut checked_handover = false;
    while !sim.finished() {
        let ev = sim.next_event().expect("event");
        sim.execute_event(ev).expect("execute");

        let f = sim.find_facility(fac).expect("facility");
        if sim.now() == SimTime(1.0) {
            assert_eq!(f.free(), 0);
            assert_eq!(f.queue_len(), 1);
        }
        if sim.now() == SimTime(4.0) && ev.is_facility_event() {
            // B 立即获得空位，等待时间为 4 - 1
            assert_eq!(f.free(), 0);
            assert_eq!(f.queue_len(), 0);
            assert_eq!(f.stats.wait_time_total, 3.0);
            assert_eq!(f.stats.served, 2);
            checked_handover = true;
        }
    }
    assert!(checked_handover);

    assert_eq!(&*log.borrow(), &[(a, SimTime(4.0)), (b, SimTime(8.0))]);
    let f = sim.find_facility(fac).expect("facility");
    assert_eq!(f.free(), 1);
    assert_eq!(f.stats.served, 2);
    assert_eq!(f.stats.wait_time_total, 3.0);
    assert_eq!(f.stats.work_time_total, 8.0);
    assert_eq!(f.stats.max_queue_len, 1);
    assert_eq!(sim.now(), SimTime(8.0));
}

#[test]
fn free_capacity_is_used_without_queueing() {
    let mut sim = Simulation::new();
    let fac = sim
        .add_facility(FacilityId(7), "bench", 3, fixed(2.5))
        .expect("facility");
    let log: ExitLog = Rc::default();
    let p = sim.create_process(seize_once(fac, Rc::clone(&log)));

    let ev = sim.next_event().expect("activation");
    sim.execute_event(ev).expect("execute");

    let f = sim.find_facility(fac).expect("facility");
    assert_eq!(f.stats.served, 1);
    assert_eq!(f.free(), 2);
    assert_eq!(f.in_service(), 1);
    assert_eq!(f.queue_len(), 0);
    assert_eq!(sim.pending_events(), 1);

    let exit = sim.next_event().expect("exit");
    assert!(exit.is_facility_event());
    assert_eq!(exit.facility, Some(fac));
    assert_eq!(exit.process, Some(p));
    assert_eq!(exit.next_state, 1);
    assert_eq!(exit.start, SimTime(2.5));
    assert_eq!(exit.created, SimTime::ZERO);
}

#[test]
fn wait_queue_is_strict_fifo_and_time_is_accounted_per_waiter() {
    let mut sim = Simulation::new();
    let fac = sim
        .add_facility(FacilityId(0), "desk", 1, fixed(2.0))
        .expect("facility");
    let log: ExitLog = Rc::default();

    // t=0 占用；t=0.5、1.0、1.5 依次排队
    let first = sim.create_process(seize_once(fac, Rc::clone(&log)));
    let w1 = sim.create_process_delayed(0.5, seize_once(fac, Rc::clone(&log)));
    let w2 = sim.create_process_delayed(1.0, seize_once(fac, Rc::clone(&log)));
    let w3 = sim.create_process_delayed(1.5, seize_once(fac, Rc::clone(&log)));
    sim.run();

    assert_eq!(
        &*log.borrow(),
        &[
            (first, SimTime(2.0)),
            (w1, SimTime(4.0)),
            (w2, SimTime(6.0)),
            (w3, SimTime(8.0)),
        ]
    );
    let f = sim.find_facility(fac).expect("facility");
    // (2 - 0.5) + (4 - 1) + (6 - 1.5)
    assert_eq!(f.stats.wait_time_total, 9.0);
    assert_eq!(f.stats.served, 4);
    assert_eq!(f.stats.max_queue_len, 3);
}

#[test]
fn seize_priority_is_accepted_but_queue_stays_fifo() {
    let mut sim = Simulation::new();
    let fac = sim
        .add_facility(FacilityId(0), "desk", 1, fixed(2.0))
        .expect("facility");
    let log: ExitLog = Rc::default();

    let first = sim.create_process(seize_with_priority(fac, 0, Rc::clone(&log)));
    let low = sim.create_process_delayed(0.5, seize_with_priority(fac, -5, Rc::clone(&log)));
    let high = sim.create_process_delayed(1.0, seize_with_priority(fac, 99, Rc::clone(&log)));
    sim.run();

    assert_eq!(
        &*log.borrow(),
        &[
            (first, SimTime(2.0)),
            (low, SimTime(4.0)),
            (high, SimTime(6.0)),
        ]
    );
    let f = sim.find_facility(fac).expect("facility");
    // (2 - 0.5) + (4 - 1)
    assert_eq!(f.stats.wait_time_total, 4.5);
    assert_eq!(f.stats.served, 3);
}

#[test]
fn free_capacity_implies_empty_queue_at_every_step() {
    let scenario = ScenarioSpec {
        schema_version: 1,
        seed: Some(99),
        end_time: None,
        facilities: vec![
            FacilitySpec {
                id: FacilityId(0),
                name: "door".into(),
                capacity: 2,
                distribution: Distribution::Exponential { rate: 0.8 },
            },
            FacilitySpec {
                id: FacilityId(1),
                name: "aisle".into(),
                capacity: 5,
                distribution: Distribution::Normal {
                    mean: 6.0,
                    stddev: 3.0,
                },
            },
            FacilitySpec {
                id: FacilityId(2),
                name: "till".into(),
                capacity: 1,
                distribution: Distribution::Uniform { low: 0.5, high: 1.5 },
            },
        ],
        customers: Some(CustomerSpec {
            count: 200,
            interarrival: Distribution::Exponential { rate: 1.2 },
            route: Vec::new(),
            linger: 1.0,
        }),
    };
    let mut sim = build_shop(&scenario, None, None).expect("shop");

    let mut steps = 0;
    while !sim.finished() {
        let ev = sim.next_event().expect("event");
        sim.execute_event(ev).expect("execute");
        steps += 1;
        for f in sim.facilities() {
            assert!(f.invariant_holds(), "facility {} broke invariant", f.id());
        }
    }
    assert!(steps > 600);

    for f in sim.facilities() {
        assert_eq!(f.free(), f.capacity());
        assert_eq!(f.stats.served, 200);
    }
}

#[test]
fn facility_construction_rejects_bad_configuration() {
    let bad_uniform = Distribution::Uniform { low: 3.0, high: 1.0 };
    let err = Facility::new(FacilityId(0), "x", 1, bad_uniform).expect_err("bad uniform");
    assert!(err.is_configuration());

    let err = Facility::new(FacilityId(0), "x", 0, fixed(1.0)).expect_err("zero capacity");
    assert!(err.is_configuration());

    let mut sim = Simulation::new();
    assert!(sim.add_facility(FacilityId(0), "x", 1, bad_uniform).is_err());
    assert!(sim.find_facility(FacilityId(0)).is_none());

    sim.add_facility(FacilityId(0), "x", 1, fixed(1.0))
        .expect("facility");
    let err = sim
        .add_facility(FacilityId(0), "y", 2, fixed(1.0))
        .expect_err("duplicate");
    assert!(err.is_configuration());
    assert_eq!(sim.find_facility(FacilityId(0)).expect("kept").name(), "x");
}

#[test]
fn report_lists_facilities_in_id_order() {
    let mut sim = Simulation::new();
    sim.add_facility(FacilityId(5), "late", 1, fixed(1.0))
        .expect("facility");
    sim.add_facility(FacilityId(2), "early", 1, fixed(1.0))
        .expect("facility");
    let log: ExitLog = Rc::default();
    sim.create_process(seize_once(FacilityId(2), log));
    sim.run();

    let report = sim.report();
    assert_eq!(report.len(), 2);
    assert_eq!(report[0].id, FacilityId(2));
    assert_eq!(report[0].served, 1);
    assert_eq!(report[1].id, FacilityId(5));
    assert_eq!(report[1].served, 0);

    assert_eq!(
        report[0].to_string(),
        "Facility 2: early\n  served         : 1\n  wait_time_total: 0.000\n  work_time_total: 1.000"
    );
}
