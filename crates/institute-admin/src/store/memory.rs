use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use super::RepositoryError;
use crate::workflows::catalog::{BatchTiming, BatchTimingId, CatalogRepository, Course, CourseId};
use crate::workflows::demos::{DemoEntry, DemoId, DemoRepository};
use crate::workflows::enquiries::{Enquiry, EnquiryId, EnquiryRepository};
use crate::workflows::placement::{
    Experience, ExperienceId, NewPlacement, PlacementId, PlacementRepository, StudentPlacement,
};

#[derive(Debug, Default)]
struct Sequences {
    enquiry: u64,
    placement: u64,
    experience: u64,
    course: u64,
    batch_timing: u64,
    demo: u64,
}

impl Sequences {
    fn next(counter: &mut u64) -> u64 {
        *counter += 1;
        *counter
    }
}

#[derive(Debug, Default)]
struct Tables {
    enquiries: BTreeMap<EnquiryId, Enquiry>,
    placements: BTreeMap<PlacementId, StudentPlacement>,
    placement_by_enquiry: HashMap<EnquiryId, PlacementId>,
    courses: BTreeMap<CourseId, Course>,
    batch_timings: BTreeMap<BatchTimingId, BatchTiming>,
    demos: BTreeMap<DemoId, DemoEntry>,
    sequences: Sequences,
}

/// Record store keeping every table behind one mutex.
///
/// Every write holds the lock from its read to its last insert. Placement submission checks
/// uniqueness, inserts and closes the enquiry link as one step, and the `modify_*` operations
/// apply their change to the record as it is at write time.
#[derive(Debug, Default, Clone)]
pub struct MemoryRecordStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, RepositoryError> {
        self.tables
            .lock()
            .map_err(|_| RepositoryError::Unavailable("record store lock poisoned".to_string()))
    }
}

impl EnquiryRepository for MemoryRecordStore {
    fn insert_enquiry(&self, mut enquiry: Enquiry) -> Result<Enquiry, RepositoryError> {
        let mut tables = self.lock()?;
        enquiry.id = EnquiryId(Sequences::next(&mut tables.sequences.enquiry));
        tables.enquiries.insert(enquiry.id, enquiry.clone());
        Ok(enquiry)
    }

    fn fetch_enquiry(&self, id: EnquiryId) -> Result<Option<Enquiry>, RepositoryError> {
        Ok(self.lock()?.enquiries.get(&id).cloned())
    }

    fn list_enquiries(&self) -> Result<Vec<Enquiry>, RepositoryError> {
        Ok(self.lock()?.enquiries.values().cloned().collect())
    }

    fn modify_enquiry<E, F>(&self, id: EnquiryId, change: F) -> Result<Enquiry, E>
    where
        F: FnOnce(&mut Enquiry) -> Result<(), E>,
        E: From<RepositoryError>,
    {
        let mut tables = self.lock()?;
        let stored = tables
            .enquiries
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound)?;
        let mut draft = stored.clone();
        change(&mut draft)?;
        draft.id = id;
        *stored = draft.clone();
        Ok(draft)
    }
}

impl PlacementRepository for MemoryRecordStore {
    fn placement_for_enquiry(
        &self,
        enquiry: EnquiryId,
    ) -> Result<Option<StudentPlacement>, RepositoryError> {
        let tables = self.lock()?;
        Ok(tables
            .placement_by_enquiry
            .get(&enquiry)
            .and_then(|id| tables.placements.get(id))
            .cloned())
    }

    fn submit_placement(
        &self,
        placement: NewPlacement,
    ) -> Result<StudentPlacement, RepositoryError> {
        let mut tables = self.lock()?;
        if tables.placement_by_enquiry.contains_key(&placement.enquiry) {
            return Err(RepositoryError::Conflict);
        }
        if !tables.enquiries.contains_key(&placement.enquiry) {
            return Err(RepositoryError::NotFound);
        }

        let id = PlacementId(Sequences::next(&mut tables.sequences.placement));
        let experiences = placement
            .experiences
            .into_iter()
            .map(|experience| Experience {
                id: ExperienceId(Sequences::next(&mut tables.sequences.experience)),
                job_title: experience.job_title,
                employer: experience.employer,
                start_date: experience.start_date,
                end_date: experience.end_date,
                ongoing: experience.ongoing,
            })
            .collect();

        let stored = StudentPlacement {
            id,
            enquiry: placement.enquiry,
            full_name: placement.full_name,
            phone: placement.phone,
            email: placement.email,
            course: placement.course,
            location_current: placement.location_current,
            consent: placement.consent,
            experiences,
            created_at: placement.submitted_at,
            updated_at: placement.submitted_at,
        };

        if let Some(enquiry) = tables.enquiries.get_mut(&placement.enquiry) {
            enquiry.link_active = false;
        }
        tables.placement_by_enquiry.insert(placement.enquiry, id);
        tables.placements.insert(id, stored.clone());
        Ok(stored)
    }

    fn modify_placement<E, F>(&self, enquiry: EnquiryId, change: F) -> Result<StudentPlacement, E>
    where
        F: FnOnce(&mut StudentPlacement) -> Result<(), E>,
        E: From<RepositoryError>,
    {
        let mut tables = self.lock()?;
        let id = *tables
            .placement_by_enquiry
            .get(&enquiry)
            .ok_or(RepositoryError::NotFound)?;
        let stored = tables
            .placements
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound)?;
        let mut draft = stored.clone();
        change(&mut draft)?;
        draft.id = stored.id;
        draft.enquiry = stored.enquiry;
        draft.experiences = stored.experiences.clone();
        draft.created_at = stored.created_at;
        *stored = draft.clone();
        Ok(draft)
    }
}

impl CatalogRepository for MemoryRecordStore {
    fn insert_course(&self, mut course: Course) -> Result<Course, RepositoryError> {
        let mut tables = self.lock()?;
        let key = Course::name_key(&course.name);
        if tables
            .courses
            .values()
            .any(|existing| Course::name_key(&existing.name) == key)
        {
            return Err(RepositoryError::Conflict);
        }
        course.id = CourseId(Sequences::next(&mut tables.sequences.course));
        tables.courses.insert(course.id, course.clone());
        Ok(course)
    }

    fn fetch_course(&self, id: CourseId) -> Result<Option<Course>, RepositoryError> {
        Ok(self.lock()?.courses.get(&id).cloned())
    }

    fn list_courses(&self) -> Result<Vec<Course>, RepositoryError> {
        Ok(self.lock()?.courses.values().cloned().collect())
    }

    fn insert_batch_timing(
        &self,
        mut timing: BatchTiming,
    ) -> Result<BatchTiming, RepositoryError> {
        let mut tables = self.lock()?;
        if !tables.courses.contains_key(&timing.course) {
            return Err(RepositoryError::NotFound);
        }
        timing.id = BatchTimingId(Sequences::next(&mut tables.sequences.batch_timing));
        tables.batch_timings.insert(timing.id, timing.clone());
        Ok(timing)
    }

    fn list_batch_timings(&self) -> Result<Vec<BatchTiming>, RepositoryError> {
        Ok(self.lock()?.batch_timings.values().cloned().collect())
    }
}

impl DemoRepository for MemoryRecordStore {
    fn insert_demo(&self, mut entry: DemoEntry) -> Result<DemoEntry, RepositoryError> {
        let mut tables = self.lock()?;
        if let Some(enquiry) = entry.enquiry {
            if !tables.enquiries.contains_key(&enquiry) {
                return Err(RepositoryError::NotFound);
            }
        }
        entry.id = DemoId(Sequences::next(&mut tables.sequences.demo));
        tables.demos.insert(entry.id, entry.clone());
        Ok(entry)
    }

    fn list_demos(&self) -> Result<Vec<DemoEntry>, RepositoryError> {
        Ok(self.lock()?.demos.values().cloned().collect())
    }

    fn modify_demo<E, F>(&self, id: DemoId, change: F) -> Result<DemoEntry, E>
    where
        F: FnOnce(&mut DemoEntry) -> Result<(), E>,
        E: From<RepositoryError>,
    {
        let mut tables = self.lock()?;
        let stored = tables.demos.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        let mut draft = stored.clone();
        change(&mut draft)?;
        draft.id = id;
        *stored = draft.clone();
        Ok(draft)
    }

    fn move_enquiry_to_demo(
        &self,
        enquiry: EnquiryId,
        now: DateTime<Utc>,
    ) -> Result<DemoEntry, RepositoryError> {
        let mut tables = self.lock()?;
        let source = tables
            .enquiries
            .get_mut(&enquiry)
            .ok_or(RepositoryError::NotFound)?;
        if source.moved_to_demo {
            return Err(RepositoryError::Conflict);
        }
        source.moved_to_demo = true;
        source.updated_at = now;
        let mut entry = DemoEntry::from_enquiry(source, now);

        entry.id = DemoId(Sequences::next(&mut tables.sequences.demo));
        tables.demos.insert(entry.id, entry.clone());
        Ok(entry)
    }
}
