//! Integration tests for courses and lesson completion.
//!
//! Requires a running server with the catalog seeded (see the crate docs).

use boostme_core::LessonId;
use boostme_core::garden::lesson_reward;
use boostme_integration_tests::registered_client;
use reqwest::StatusCode;

#[tokio::test]
#[ignore = "Requires running server, database, and seeded catalog"]
async fn test_course_listing() {
    let (client, _) = registered_client().await;

    let courses = client.courses().await.unwrap();
    let course = courses.first().expect("Catalog has no courses");
    assert!(course.lesson_count > 0);

    let lessons = client.lessons(course.id).await.unwrap();
    assert_eq!(i64::try_from(lessons.len()).unwrap(), course.lesson_count);
    assert!(lessons.windows(2).all(|w| w[0].position < w[1].position));

    let err = client
        .course(boostme_core::CourseId::new(i32::MAX))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
}

#[tokio::test]
#[ignore = "Requires running server, database, and seeded catalog"]
async fn test_complete_lesson_once() {
    let (client, _) = registered_client().await;
    let course = client.courses().await.unwrap().into_iter().next().unwrap();
    let lesson = client
        .lessons(course.id)
        .await
        .unwrap()
        .into_iter()
        .next()
        .unwrap();

    let first = client.complete_lesson(lesson.id).await.unwrap();
    assert!(!first.already_completed);
    assert_eq!(first.reward, lesson_reward(lesson.duration_minutes));

    let second = client.complete_lesson(lesson.id).await.unwrap();
    assert!(second.already_completed);
    assert!(second.reward.is_empty());
    assert_eq!(second.update.garden.xp, first.update.garden.xp);

    let stats = client.stats().await.unwrap();
    assert_eq!(stats.lessons_completed, 1);
}

#[tokio::test]
#[ignore = "Requires running server, database, and seeded catalog"]
async fn test_complete_course_adds_bonus() {
    let (client, _) = registered_client().await;
    let course = client.courses().await.unwrap().into_iter().next().unwrap();
    let lessons = client.lessons(course.id).await.unwrap();

    let mut last = None;
    for lesson in &lessons {
        last = Some(client.complete_lesson(lesson.id).await.unwrap());
    }
    let last = last.unwrap();
    assert!(last.course_completed);

    let stats = client.stats().await.unwrap();
    assert_eq!(stats.courses_completed, 1);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_complete_unknown_lesson() {
    let (client, _) = registered_client().await;
    let err = client
        .complete_lesson(LessonId::new(i32::MAX))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
}
