#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

use exam_scheduler::basic_types::CourseId;
use exam_scheduler::basic_types::RoomTable;
use exam_scheduler::basic_types::Schedule;
use exam_scheduler::basic_types::Slot;
use exam_scheduler::containers::StorageKey;
use exam_scheduler::decode_coloring;
use exam_scheduler::encoders::encode_coloring;
use exam_scheduler::encoders::encode_joint;
use exam_scheduler::encoders::expected_clause_count;
use exam_scheduler::graph::ConflictGraph;
use exam_scheduler::graph::ConflictGraphBuilder;
use exam_scheduler::oracles::BacktrackingSmtOracle;
use exam_scheduler::oracles::DpllOracle;
use exam_scheduler::oracles::SatOracle;
use exam_scheduler::oracles::SatisfactionOutcome;
use exam_scheduler::oracles::SmtOracle;
use exam_scheduler::ExamScheduler;
use exam_scheduler::SchedulerOptions;
use exam_scheduler::SchedulingOutcome;
use exam_scheduler::Validator;
use rand::rngs::SmallRng;
use rand::Rng;
use rand::SeedableRng;

fn random_graph(rng: &mut SmallRng, num_courses: usize, num_students: usize) -> ConflictGraph {
    let mut builder = ConflictGraphBuilder::default();
    for course in 0..num_courses {
        builder.add_course(format!("course-{course:02}"));
    }

    for student in 0..num_students {
        let num_taken = rng.gen_range(1..=3);
        for _ in 0..num_taken {
            let course = rng.gen_range(0..num_courses);
            builder.enroll(student as u64, format!("course-{course:02}"));
        }
    }

    builder.build()
}

/// Whether `slot_of` gives conflicting courses different slots.
fn is_proper_coloring(graph: &ConflictGraph, slot_of: impl Fn(CourseId) -> Slot) -> bool {
    graph
        .conflicting_pairs()
        .iter()
        .all(|&(first, second)| slot_of(first) != slot_of(second))
}

#[test]
fn clause_count_follows_the_closed_form() {
    let mut rng = SmallRng::seed_from_u64(42);

    for _ in 0..20 {
        let num_courses = rng.gen_range(1..12);
        let num_students = rng.gen_range(0..20);
        let graph = random_graph(&mut rng, num_courses, num_students);

        for num_slots in 1..=6 {
            let encoding = encode_coloring(&graph, num_slots).unwrap();

            let n = graph.num_courses();
            let e = graph.num_conflicts();
            let k = num_slots as usize;
            assert_eq!(n + n * k * (k - 1) / 2 + e * k, encoding.formula.num_clauses());
            assert_eq!(
                expected_clause_count(n, e, num_slots),
                encoding.formula.num_clauses()
            );
            assert_eq!(n * k, encoding.formula.num_variables());
        }
    }
}

#[test]
fn literals_round_trip_through_the_mapping() {
    let mut rng = SmallRng::seed_from_u64(7);
    let graph = random_graph(&mut rng, 9, 15);
    let encoding = encode_coloring(&graph, 4).unwrap();

    let mut seen = vec![false; encoding.mapping.num_variables() + 1];
    for course in graph.course_ids() {
        for slot in (1..=4).map(Slot::new) {
            let literal = encoding.mapping.literal(course, slot);

            assert_eq!(Some((course, slot)), encoding.mapping.decode(literal));

            let code = literal.get() as usize;
            assert!(!seen[code], "literal {code} is used twice");
            seen[code] = true;
        }
    }
    assert!(seen[1..].iter().all(|&used| used));
}

#[test]
fn every_model_decodes_to_a_proper_coloring() {
    let mut rng = SmallRng::seed_from_u64(1234);

    for _ in 0..15 {
        let graph = random_graph(&mut rng, 7, 10);

        for num_slots in 1..=4 {
            let encoding = encode_coloring(&graph, num_slots).unwrap();
            let outcome = DpllOracle::default()
                .solve(&encoding.formula, None)
                .unwrap();

            let SatisfactionOutcome::Satisfiable(model) = outcome else {
                continue;
            };
            assert!(encoding.formula.is_satisfied_by(&model));

            let schedule = decode_coloring(&model, &encoding.mapping, &graph).unwrap();
            assert_eq!(graph.num_courses(), schedule.len());
            assert!(is_proper_coloring(&graph, |course| {
                schedule.slot_of(&graph.course(course).name).unwrap()
            }));

            let report = Validator::new(&graph)
                .with_num_slots(num_slots)
                .check_coloring(&schedule)
                .unwrap();
            assert!(report.is_valid(), "{report:?}");
        }
    }
}

#[test]
fn adding_slots_never_removes_solutions() {
    let mut rng = SmallRng::seed_from_u64(99);

    for _ in 0..10 {
        let graph = random_graph(&mut rng, 6, 12);

        let satisfiable = (1..=6)
            .map(|num_slots| {
                let options = SchedulerOptions {
                    num_slots,
                    timeout: None,
                };
                let outcome = ExamScheduler::new(&graph, options)
                    .schedule_slots(&mut DpllOracle::default())
                    .unwrap();

                match outcome {
                    SchedulingOutcome::Scheduled { report, .. } => {
                        assert!(report.is_valid());
                        true
                    }
                    SchedulingOutcome::Unsatisfiable => false,
                    SchedulingOutcome::Unknown => panic!("no timeout was given"),
                }
            })
            .collect::<Vec<_>>();

        // As many slots as courses always suffice.
        assert!(satisfiable[5]);
        for window in satisfiable.windows(2) {
            assert!(!window[0] || window[1], "{satisfiable:?}");
        }
    }
}

#[test]
fn validator_accepts_exactly_the_proper_colorings() {
    let mut rng = SmallRng::seed_from_u64(5);

    for _ in 0..10 {
        let graph = random_graph(&mut rng, 8, 12);
        let validator = Validator::new(&graph).with_num_slots(3);

        for _ in 0..30 {
            let slots = graph
                .course_ids()
                .map(|_| Slot::new(rng.gen_range(1..=3)))
                .collect::<Vec<_>>();
            let schedule: Schedule = graph
                .courses()
                .map(|(id, course)| (course.name.as_str(), slots[id.index()]))
                .collect();

            let report = validator.check_coloring(&schedule).unwrap();
            let proper = is_proper_coloring(&graph, |course| slots[course.index()]);

            assert_eq!(proper, report.is_valid());
        }
    }
}

#[test]
fn joint_oracle_agrees_with_exhaustive_search() {
    let mut rng = SmallRng::seed_from_u64(2024);

    for _ in 0..12 {
        let graph = random_graph(&mut rng, 4, 6);
        let rooms = RoomTable::from_rooms([("Hall", rng.gen_range(1..=4)), ("Annex", 2)]).unwrap();
        let num_slots = rng.gen_range(1..=2);

        let problem = encode_joint(&graph, &rooms, num_slots).unwrap();
        let outcome = BacktrackingSmtOracle::default().check(&problem, None).unwrap();

        let exists = exists_joint_schedule(&graph, &rooms, num_slots);
        assert_eq!(exists, outcome.is_satisfiable());

        if let SatisfactionOutcome::Satisfiable(model) = outcome {
            assert!(problem.is_satisfied_by(&model));
        }
    }
}

/// Try every combination of slots and rooms.
fn exists_joint_schedule(graph: &ConflictGraph, rooms: &RoomTable, num_slots: u32) -> bool {
    let courses = graph.courses().map(|(_, course)| course).collect::<Vec<_>>();
    let rooms = rooms.rooms().map(|(_, room)| room).collect::<Vec<_>>();
    let options = num_slots as usize * rooms.len();

    let mut choice = vec![0; courses.len()];
    loop {
        let placement = |course: usize| (choice[course] / rooms.len(), choice[course] % rooms.len());

        let fits = (0..courses.len())
            .all(|course| rooms[placement(course).1].capacity >= courses[course].enrollment);
        let exclusive = (0..courses.len()).all(|first| {
            (first + 1..courses.len()).all(|second| placement(first) != placement(second))
        });
        let conflict_free = graph.conflicting_pairs().iter().all(|&(first, second)| {
            placement(first.index()).0 != placement(second.index()).0
        });

        if fits && exclusive && conflict_free {
            return true;
        }

        let mut position = 0;
        loop {
            if position == choice.len() {
                return false;
            }
            choice[position] += 1;
            if choice[position] < options {
                break;
            }
            choice[position] = 0;
            position += 1;
        }
    }
}
