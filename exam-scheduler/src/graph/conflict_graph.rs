use fnv::FnvHashMap;

use crate::basic_types::Course;
use crate::basic_types::CourseId;
use crate::basic_types::StudentId;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;

/// An edge of the conflict graph: `student` takes both courses.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConflictEdge {
    /// The course with the smaller id.
    pub first: CourseId,
    pub second: CourseId,
    pub student: StudentId,
}

/// The conflict graph over a frozen, ordered set of courses.
///
/// Course ids are handed out in ascending order of course name, so any structure derived from
/// the ids (literal numbers, SMT variables) is reproducible across runs. Construct it with a
/// [`ConflictGraphBuilder`](super::ConflictGraphBuilder).
#[derive(Clone, Debug)]
pub struct ConflictGraph {
    courses: KeyedVec<CourseId, Course>,
    ids: FnvHashMap<String, CourseId>,
    edges: Vec<ConflictEdge>,
    /// Distinct pairs `(a, b)` with `a < b`, sorted.
    conflicting_pairs: Vec<(CourseId, CourseId)>,
    neighbours: KeyedVec<CourseId, Vec<CourseId>>,
}

impl ConflictGraph {
    pub(crate) fn new(courses: KeyedVec<CourseId, Course>, mut edges: Vec<ConflictEdge>) -> Self {
        let ids = courses
            .entries()
            .map(|(id, course)| (course.name.clone(), id))
            .collect::<FnvHashMap<_, _>>();
        crate::scheduler_assert_eq_simple!(ids.len(), courses.len(), "course names are unique");

        for edge in edges.iter_mut() {
            if edge.second < edge.first {
                std::mem::swap(&mut edge.first, &mut edge.second);
            }
            crate::scheduler_assert_simple!(edge.first != edge.second, "self-conflict");
        }

        let mut conflicting_pairs = edges
            .iter()
            .map(|edge| (edge.first, edge.second))
            .collect::<Vec<_>>();
        conflicting_pairs.sort_unstable();
        conflicting_pairs.dedup();

        let mut neighbours = vec![Vec::new(); courses.len()];
        for &(first, second) in conflicting_pairs.iter() {
            neighbours[first.index()].push(second);
            neighbours[second.index()].push(first);
        }
        let neighbours = neighbours
            .into_iter()
            .map(|mut adjacent| {
                adjacent.sort_unstable();
                adjacent
            })
            .collect();

        ConflictGraph {
            courses,
            ids,
            edges,
            conflicting_pairs,
            neighbours,
        }
    }

    pub fn num_courses(&self) -> usize {
        self.courses.len()
    }

    /// The courses in their frozen order.
    pub fn courses(&self) -> impl Iterator<Item = (CourseId, &Course)> + '_ {
        self.courses.entries()
    }

    pub fn course_ids(&self) -> impl Iterator<Item = CourseId> + Clone {
        self.courses.keys()
    }

    pub fn course(&self, id: CourseId) -> &Course {
        &self.courses[id]
    }

    pub fn course_id(&self, name: &str) -> Option<CourseId> {
        self.ids.get(name).copied()
    }

    /// Every edge of the multigraph, one per student and course pair.
    pub fn edges(&self) -> &[ConflictEdge] {
        &self.edges
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// The distinct conflicting course pairs `(a, b)` with `a < b`, in ascending order.
    pub fn conflicting_pairs(&self) -> &[(CourseId, CourseId)] {
        &self.conflicting_pairs
    }

    pub fn num_conflicts(&self) -> usize {
        self.conflicting_pairs.len()
    }

    /// The courses which conflict with `course`, in ascending order.
    pub fn neighbours(&self, course: CourseId) -> &[CourseId] {
        &self.neighbours[course]
    }

    pub fn are_conflicting(&self, a: CourseId, b: CourseId) -> bool {
        let pair = if a < b { (a, b) } else { (b, a) };
        self.conflicting_pairs.binary_search(&pair).is_ok()
    }

    /// Find the position of a conflicting pair in [`ConflictGraph::conflicting_pairs`].
    pub fn conflict_index(&self, a: CourseId, b: CourseId) -> Option<usize> {
        let pair = if a < b { (a, b) } else { (b, a) };
        self.conflicting_pairs.binary_search(&pair).ok()
    }
}
