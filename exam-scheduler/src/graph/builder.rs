use std::collections::BTreeMap;
use std::collections::BTreeSet;

use itertools::Itertools;
use log::debug;

use super::ConflictEdge;
use super::ConflictGraph;
use crate::basic_types::Course;
use crate::basic_types::CourseId;
use crate::basic_types::StudentId;
use crate::containers::KeyedVec;

/// Course titles which appear in enrollment records but never sit a final exam on campus.
pub const STUDY_AWAY_COURSES: [&str; 7] = [
    "Domestic Study Away",
    "International Study Away",
    "Doshisha University",
    "New College Oxford",
    "Gottingen University",
    "UIC Yonsei University",
    "Universidad de los Andes",
];

#[derive(Clone, Debug, Default)]
struct CourseRecord {
    students: BTreeSet<StudentId>,
    enrollment: Option<u32>,
}

/// Collects enrollment records and turns them into a [`ConflictGraph`].
///
/// # Example
/// ```
/// # use exam_scheduler::graph::ConflictGraphBuilder;
/// # use exam_scheduler::graph::STUDY_AWAY_COURSES;
/// let mut builder = ConflictGraphBuilder::default().with_excluded_courses(STUDY_AWAY_COURSES);
/// builder.enroll("s1", "Algebra");
/// builder.enroll("s1", "Biology");
/// builder.enroll("s1", "New College Oxford");
/// builder.enroll("s2", "Chemistry");
///
/// let graph = builder.build();
///
/// assert_eq!(3, graph.num_courses());
/// assert_eq!(1, graph.num_conflicts());
/// ```
#[derive(Clone, Debug, Default)]
pub struct ConflictGraphBuilder {
    excluded: BTreeSet<String>,
    courses: BTreeMap<String, CourseRecord>,
    students: BTreeMap<StudentId, BTreeSet<String>>,
}

impl ConflictGraphBuilder {
    /// Never schedule the given course titles. Records mentioning them are dropped when the graph
    /// is built.
    pub fn with_excluded_courses<Name: Into<String>>(
        mut self,
        titles: impl IntoIterator<Item = Name>,
    ) -> Self {
        self.excluded.extend(titles.into_iter().map(Into::into));
        self
    }

    /// Declare a course, even if no student takes it.
    pub fn add_course(&mut self, name: impl Into<String>) {
        let _ = self.courses.entry(name.into()).or_default();
    }

    /// Record that `student` takes `course`. Recording the same enrollment twice has no effect.
    pub fn enroll(&mut self, student: impl Into<StudentId>, course: impl Into<String>) {
        let student = student.into();
        let course = course.into();

        let _ = self
            .courses
            .entry(course.clone())
            .or_default()
            .students
            .insert(student.clone());
        let _ = self.students.entry(student).or_default().insert(course);
    }

    /// Record all courses of one student.
    pub fn enroll_all<Name: Into<String>>(
        &mut self,
        student: impl Into<StudentId>,
        courses: impl IntoIterator<Item = Name>,
    ) {
        let student = student.into();
        for course in courses {
            self.enroll(student.clone(), course);
        }
    }

    /// Use `enrollment` as the size of the course instead of the number of recorded students.
    pub fn set_enrollment(&mut self, course: impl Into<String>, enrollment: u32) {
        self.courses.entry(course.into()).or_default().enrollment = Some(enrollment);
    }

    /// Freeze the course order and create the graph.
    ///
    /// Every retained course becomes a node, and for every student every unordered pair of their
    /// retained courses becomes an edge labelled with that student.
    pub fn build(&self) -> ConflictGraph {
        let mut ids = BTreeMap::new();
        let courses: KeyedVec<CourseId, Course> = self
            .courses
            .iter()
            .filter(|(name, _)| !self.excluded.contains(*name))
            .map(|(name, record)| {
                let enrollment = record
                    .enrollment
                    .unwrap_or_else(|| record.students.len() as u32);
                Course::new(name.as_str(), enrollment)
            })
            .collect();
        for (id, course) in courses.entries() {
            let _ = ids.insert(course.name.as_str(), id);
        }

        let mut edges = vec![];
        for (student, taken) in self.students.iter() {
            let retained = taken.iter().filter_map(|name| ids.get(name.as_str()));

            for (&first, &second) in retained.tuple_combinations() {
                edges.push(ConflictEdge {
                    first,
                    second,
                    student: student.clone(),
                });
            }
        }

        let graph = ConflictGraph::new(courses, edges);
        debug!(
            "Built conflict graph with {} courses, {} edges and {} conflicting pairs",
            graph.num_courses(),
            graph.num_edges(),
            graph.num_conflicts()
        );

        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(graph: &ConflictGraph, name: &str) -> CourseId {
        graph.course_id(name).unwrap()
    }

    #[test]
    fn shared_students_create_parallel_edges_but_one_conflict() {
        let mut builder = ConflictGraphBuilder::default();
        builder.enroll_all("s1", ["A", "B"]);
        builder.enroll_all("s2", ["A", "B"]);
        builder.enroll_all("s3", ["B", "C"]);

        let graph = builder.build();

        assert_eq!(3, graph.num_edges());
        assert_eq!(2, graph.num_conflicts());
        assert!(graph.are_conflicting(id(&graph, "B"), id(&graph, "A")));
        assert!(!graph.are_conflicting(id(&graph, "A"), id(&graph, "C")));
        assert_eq!(
            &[id(&graph, "A"), id(&graph, "C")],
            graph.neighbours(id(&graph, "B"))
        );
    }

    #[test]
    fn edges_are_labelled_with_the_responsible_student() {
        let mut builder = ConflictGraphBuilder::default();
        builder.enroll_all("s7", ["A", "B"]);

        let graph = builder.build();

        assert_eq!(
            &[ConflictEdge {
                first: id(&graph, "A"),
                second: id(&graph, "B"),
                student: StudentId::from("s7"),
            }],
            graph.edges()
        );
    }

    #[test]
    fn single_course_students_and_declared_courses_are_isolated_nodes() {
        let mut builder = ConflictGraphBuilder::default();
        builder.enroll("s1", "A");
        builder.add_course("B");

        let graph = builder.build();

        assert_eq!(2, graph.num_courses());
        assert_eq!(0, graph.num_edges());
        assert!(graph.neighbours(id(&graph, "A")).is_empty());
    }

    #[test]
    fn excluded_courses_never_become_nodes() {
        let mut builder =
            ConflictGraphBuilder::default().with_excluded_courses(STUDY_AWAY_COURSES);
        builder.enroll_all("s1", ["A", "Doshisha University"]);
        builder.enroll_all("s2", ["Domestic Study Away", "A", "B"]);

        let graph = builder.build();

        assert_eq!(2, graph.num_courses());
        assert_eq!(None, graph.course_id("Doshisha University"));
        assert_eq!(1, graph.num_edges());
        assert_eq!(2, graph.course(id(&graph, "A")).enrollment);
    }

    #[test]
    fn course_order_is_frozen_by_name() {
        let mut builder = ConflictGraphBuilder::default();
        builder.enroll_all(3_u64, ["Zoology", "Art"]);
        builder.enroll(1_u64, "Music");

        let graph = builder.build();

        let names = graph
            .courses()
            .map(|(_, course)| course.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(vec!["Art", "Music", "Zoology"], names);
    }

    #[test]
    fn enrollment_can_be_overridden() {
        let mut builder = ConflictGraphBuilder::default();
        builder.enroll("s1", "A");
        builder.set_enrollment("A", 40);
        builder.set_enrollment("B", 20);

        let graph = builder.build();

        assert_eq!(40, graph.course(id(&graph, "A")).enrollment);
        assert_eq!(20, graph.course(id(&graph, "B")).enrollment);
    }
}
