#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024
#![cfg(unix)]

//! The external oracles are exercised with `sh` scripts which behave like solver binaries: they
//! receive the exchange file as their last argument and print a canned answer.

use std::time::Duration;
use std::time::Instant;

use dimacs_format::SolverOutputError;
use exam_scheduler::basic_types::RoomTable;
use exam_scheduler::basic_types::Slot;
use exam_scheduler::graph::ConflictGraph;
use exam_scheduler::graph::ConflictGraphBuilder;
use exam_scheduler::oracles::ExternalSatOracle;
use exam_scheduler::oracles::ExternalSmtOracle;
use exam_scheduler::oracles::OracleError;
use exam_scheduler::ExamScheduler;
use exam_scheduler::SchedulerOptions;
use exam_scheduler::SchedulingError;
use exam_scheduler::SchedulingOutcome;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn fake_sat_solver(script: &str) -> ExternalSatOracle {
    ExternalSatOracle::new("sh").with_args(["-c", script, "fake-solver"])
}

fn fake_smt_solver(script: &str) -> ExternalSmtOracle {
    ExternalSmtOracle::new("sh").with_args(["-c", script, "fake-solver"])
}

fn options(num_slots: u32, timeout: Option<Duration>) -> SchedulerOptions {
    SchedulerOptions { num_slots, timeout }
}

/// Courses A, B and C where only A and B share a student.
fn three_courses() -> ConflictGraph {
    let mut builder = ConflictGraphBuilder::default();
    builder.enroll_all("s1", ["A", "B"]);
    builder.enroll("s2", "C");
    builder.build()
}

#[test]
fn satisfiable_answer_is_decoded_and_validated() {
    init_logging();
    let graph = three_courses();
    // The header must declare all n * k = 6 variables.
    let mut oracle = fake_sat_solver(
        r#"grep -q '^p cnf 6 8$' "$1" || exit 1
printf 'c fake\ns SATISFIABLE\nv 1 -2 -3 4\nv 5 -6 0\n'
exit 10"#,
    );

    let outcome = ExamScheduler::new(&graph, options(2, None))
        .schedule_slots(&mut oracle)
        .unwrap();

    let schedule = outcome.accepted().expect("a valid schedule");
    assert_eq!(Some(Slot::new(1)), schedule.slot_of("A"));
    assert_eq!(Some(Slot::new(2)), schedule.slot_of("B"));
    assert_eq!(Some(Slot::new(1)), schedule.slot_of("C"));
}

#[test]
fn wrong_answer_is_caught_by_the_validator() {
    let graph = three_courses();
    let mut oracle = fake_sat_solver("printf 's SATISFIABLE\\nv 1 -2 3 -4 5 -6 0\\n'");

    let outcome = ExamScheduler::new(&graph, options(2, None))
        .schedule_slots(&mut oracle)
        .unwrap();

    let SchedulingOutcome::Scheduled { report, .. } = outcome else {
        panic!("expected a schedule, got {outcome:?}");
    };
    assert_eq!(1, report.len());
    assert_eq!(
        vec!["A".to_owned(), "B".to_owned()],
        report.first().unwrap().courses
    );
}

#[test]
fn unsatisfiable_answer_is_not_an_error() {
    let graph = three_courses();
    let mut oracle = fake_sat_solver("echo 's UNSATISFIABLE'; exit 20");

    let outcome = ExamScheduler::new(&graph, options(1, None))
        .schedule_slots(&mut oracle)
        .unwrap();

    assert_eq!(SchedulingOutcome::Unsatisfiable, outcome);
}

#[test]
fn slow_solver_is_killed_and_inconclusive() {
    init_logging();
    let graph = three_courses();
    let mut oracle = fake_sat_solver("sleep 10; echo 's UNSATISFIABLE'");

    let started = Instant::now();
    let outcome = ExamScheduler::new(&graph, options(2, Some(Duration::from_millis(200))))
        .schedule_slots(&mut oracle)
        .unwrap();

    assert_eq!(SchedulingOutcome::Unknown, outcome);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[test]
fn output_without_status_is_an_oracle_error() {
    let graph = three_courses();
    let mut oracle = fake_sat_solver("echo 'c out of memory'");

    let result = ExamScheduler::new(&graph, options(2, None)).schedule_slots(&mut oracle);

    assert!(matches!(
        result,
        Err(SchedulingError::Oracle(OracleError::SolverOutput(
            SolverOutputError::MissingStatus
        )))
    ));
}

#[test]
fn missing_solver_binary_is_an_io_error() {
    let graph = three_courses();
    let mut oracle = ExternalSatOracle::new("/nonexistent/sat-solver");

    let result = ExamScheduler::new(&graph, options(2, None)).schedule_slots(&mut oracle);

    assert!(matches!(
        result,
        Err(SchedulingError::Oracle(OracleError::Io(_)))
    ));
}

#[test]
fn smt_model_is_decoded_into_rooms() {
    init_logging();
    let mut builder = ConflictGraphBuilder::default();
    builder.set_enrollment("X", 40);
    builder.set_enrollment("Y", 20);
    let graph = builder.build();
    let rooms = RoomTable::from_rooms([("Seminar", 30), ("Hall", 50)]).unwrap();

    let mut oracle = fake_smt_solver(
        r#"grep -q '(declare-const room_1 Int)' "$1" || exit 1
grep -q '(check-sat)' "$1" || exit 1
printf 'sat\n((time_0 1)\n (room_0 2)\n (time_1 1)\n (room_1 1))\n'"#,
    );

    let outcome = ExamScheduler::new(&graph, options(1, None))
        .schedule_rooms(&rooms, &mut oracle)
        .unwrap();

    let schedule = outcome.accepted().expect("a valid schedule");
    assert_eq!("Hall", schedule.placement_of("X").unwrap().room);
    assert_eq!("Seminar", schedule.placement_of("Y").unwrap().room);
}

#[test]
fn smt_unsat_is_not_an_error() {
    let mut builder = ConflictGraphBuilder::default();
    builder.set_enrollment("X", 40);
    let graph = builder.build();
    let rooms = RoomTable::from_rooms([("Seminar", 30)]).unwrap();

    let mut oracle = fake_smt_solver(
        r#"printf 'unsat\n(error "line 9 column 10: model is not available")\n'"#,
    );

    let outcome = ExamScheduler::new(&graph, options(1, None))
        .schedule_rooms(&rooms, &mut oracle)
        .unwrap();

    assert_eq!(SchedulingOutcome::Unsatisfiable, outcome);
}

#[test]
fn smt_minimisation_reads_the_objective() {
    let mut builder = ConflictGraphBuilder::default();
    builder.enroll_all("s1", ["A", "B"]);
    let graph = builder.build();
    let rooms = RoomTable::from_rooms([("Hall", 10), ("Annex", 10)]).unwrap();

    let mut oracle = fake_smt_solver(
        r#"grep -q '(minimize conflict_cost)' "$1" || exit 1
printf 'sat\n((time_0 1) (room_0 1) (time_1 1) (room_1 2) (penalty_0 1) (conflict_cost 1))\n'"#,
    );

    let outcome = ExamScheduler::new(&graph, options(1, None))
        .schedule_rooms_minimising_conflicts(&rooms, &mut oracle)
        .unwrap();

    let SchedulingOutcome::Scheduled { schedule, report } = outcome else {
        panic!("expected a schedule, got {outcome:?}");
    };
    assert_eq!(1, schedule.num_conflicts);
    assert!(schedule.proven_optimal);
    assert_eq!(1, report.len());
}

#[test]
fn slow_smt_solver_is_inconclusive() {
    let graph = three_courses();
    let rooms = RoomTable::from_rooms([("Hall", 10)]).unwrap();
    let mut oracle = fake_smt_solver("sleep 10; echo sat");

    let outcome = ExamScheduler::new(&graph, options(3, Some(Duration::from_millis(200))))
        .schedule_rooms(&rooms, &mut oracle)
        .unwrap();

    assert_eq!(SchedulingOutcome::Unknown, outcome);
}
