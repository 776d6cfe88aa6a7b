//! Course store module
//!
//! Ordered in-memory collection of course records. Lookups are linear scans
//! in insertion order and always act on the first matching id; duplicate ids
//! are accepted. The store does no validation of its own.
//!
//! The store is not synchronized; `AppState` wraps it in a lock.

mod course;

pub use course::Course;

/// In-memory course collection
#[derive(Debug, Default)]
pub struct CourseStore {
    courses: Vec<Course>,
}

impl CourseStore {
    pub const fn new() -> Self {
        Self {
            courses: Vec::new(),
        }
    }

    /// Append a course and hand it back unchanged
    pub fn add(&mut self, course: Course) -> Course {
        self.courses.push(course.clone());
        course
    }

    /// All courses in insertion order
    pub fn get_all(&self) -> &[Course] {
        &self.courses
    }

    pub fn get_by_id(&self, id: i64) -> Option<&Course> {
        self.courses.iter().find(|c| c.course_id == id)
    }

    /// Replace the first course with a matching id
    ///
    /// The replacement is stored as given, including its own `course_id`,
    /// which may differ from `id`.
    pub fn update(&mut self, id: i64, course: Course) -> Option<Course> {
        let slot = self.courses.iter_mut().find(|c| c.course_id == id)?;
        *slot = course.clone();
        Some(course)
    }

    /// Remove the first course with a matching id
    pub fn delete(&mut self, id: i64) -> bool {
        match self.courses.iter().position(|c| c.course_id == id) {
            Some(index) => {
                self.courses.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn search_by_title(&self, title: &str) -> Vec<&Course> {
        self.courses
            .iter()
            .filter(|c| c.title_contains(title))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}
