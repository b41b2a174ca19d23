//! Static seed data loaded into a page when it is opened.

use crate::records::{
    Announcement, AnnouncementCategory, Attachment, ClassInfo, Grade, GradeCategory, Resource,
    ResourceCategory, ResourceType,
};

fn announcement(
    id: &str,
    title: &str,
    content: &str,
    author: &str,
    category: AnnouncementCategory,
    date: &str,
    pinned: bool,
) -> Announcement {
    Announcement {
        id: id.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        author: author.to_string(),
        category,
        date: date.to_string(),
        pinned,
    }
}

pub fn announcements() -> Vec<Announcement> {
    vec![
        announcement(
            "ann-1",
            "Welcome to the new semester",
            "Timetables are now published. Check your class pages for room changes.",
            "Academic Office",
            AnnouncementCategory::General,
            "2024-01-08T09:00:00",
            true,
        ),
        announcement(
            "ann-2",
            "Midterm examination schedule",
            "Midterms run from 4 March. Seating plans will be posted one week before.",
            "Examinations Unit",
            AnnouncementCategory::Academic,
            "2024-02-12T14:30:00",
            false,
        ),
        announcement(
            "ann-3",
            "Library closed for maintenance",
            "The main library is closed this Saturday. Online resources stay available.",
            "Library Services",
            AnnouncementCategory::Urgent,
            "2024-02-20T08:15:00",
            false,
        ),
        announcement(
            "ann-4",
            "Career fair",
            "Meet employers in the main hall. Bring printed copies of your CV.",
            "Student Affairs",
            AnnouncementCategory::Event,
            "2024-03-01T10:00:00",
            false,
        ),
        announcement(
            "ann-5",
            "Assignment 2 deadline extended",
            "The deadline for Assignment 2 has moved to Friday at 17:00.",
            "Dr. Rahman",
            AnnouncementCategory::Academic,
            "2024-02-12T14:30:00",
            false,
        ),
    ]
}

fn resource(
    id: &str,
    title: &str,
    description: &str,
    category: ResourceCategory,
    kind: ResourceType,
    date: &str,
    files: &[(&str, u64)],
) -> Resource {
    Resource {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        category,
        kind,
        date: date.to_string(),
        files: files
            .iter()
            .map(|(name, size)| Attachment {
                name: name.to_string(),
                size_bytes: *size,
                mime_type: None,
            })
            .collect(),
    }
}

pub fn resources() -> Vec<Resource> {
    vec![
        resource(
            "res-1",
            "Week 1: Introduction",
            "Course overview and learning outcomes.",
            ResourceCategory::LectureNotes,
            ResourceType::Pdf,
            "2024-01-10",
            &[("week1-intro.pdf", 482_304)],
        ),
        resource(
            "res-2",
            "Week 2: Data Structures",
            "Arrays, linked lists and stacks with worked examples.",
            ResourceCategory::LectureNotes,
            ResourceType::Pdf,
            "2024-01-17",
            &[("week2-structures.pdf", 655_360)],
        ),
        resource(
            "res-3",
            "Assignment 1 brief",
            "Implement a sorted list. Submission through the portal.",
            ResourceCategory::Assignments,
            ResourceType::Document,
            "2024-01-20",
            &[("assignment1.docx", 38_912)],
        ),
        resource(
            "res-4",
            "Recorded lecture: Recursion",
            "Full recording of the week 3 lecture.",
            ResourceCategory::Videos,
            ResourceType::Video,
            "2024-01-24",
            &[],
        ),
        resource(
            "res-5",
            "Further reading on algorithms",
            "Chapter list and links to the online textbook.",
            ResourceCategory::Readings,
            ResourceType::Link,
            "2024-01-24",
            &[],
        ),
        resource(
            "res-6",
            "Assignment 2 brief",
            "Hash tables and collision handling.",
            ResourceCategory::Assignments,
            ResourceType::Document,
            "2024-02-07",
            &[("assignment2.docx", 41_472)],
        ),
    ]
}

fn grade(
    id: &str,
    title: &str,
    category: GradeCategory,
    score: f64,
    max_score: f64,
    percentage: f64,
    date: &str,
) -> Grade {
    Grade {
        id: id.to_string(),
        title: title.to_string(),
        category,
        score,
        max_score,
        percentage,
        date: date.to_string(),
    }
}

/// Weights sum to 45: grading is still in progress.
pub fn grades() -> Vec<Grade> {
    vec![
        grade(
            "grd-1",
            "Assignment 1",
            GradeCategory::Assignment,
            85.0,
            100.0,
            20.0,
            "2024-02-02",
        ),
        grade(
            "grd-2",
            "Quiz 1",
            GradeCategory::Quiz,
            18.0,
            20.0,
            10.0,
            "2024-02-09",
        ),
        grade(
            "grd-3",
            "Midterm Exam",
            GradeCategory::Exam,
            45.0,
            50.0,
            15.0,
            "2024-03-06",
        ),
    ]
}

pub fn classes() -> Vec<ClassInfo> {
    vec![
        ClassInfo {
            id: "cls-1".to_string(),
            code: "CS101".to_string(),
            name: "Introduction to Programming".to_string(),
            lecturer: "Dr. Rahman".to_string(),
            schedule: "Mon & Wed 09:00".to_string(),
            room: "B-204".to_string(),
        },
        ClassInfo {
            id: "cls-2".to_string(),
            code: "CS201".to_string(),
            name: "Data Structures and Algorithms".to_string(),
            lecturer: "Dr. Rahman".to_string(),
            schedule: "Tue & Thu 11:00".to_string(),
            room: "C-112".to_string(),
        },
        ClassInfo {
            id: "cls-3".to_string(),
            code: "MA150".to_string(),
            name: "Discrete Mathematics".to_string(),
            lecturer: "Prof. Lindqvist".to_string(),
            schedule: "Fri 13:00".to_string(),
            room: "A-015".to_string(),
        },
    ]
}
