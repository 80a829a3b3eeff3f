//! Integration tests for garden actions.
//!
//! Requires a running server with the catalog seeded (see the crate docs).

use boostme_client::{ClientError, GardenSession};
use boostme_core::garden::{ChallengeUpdate, Position, STARTING_STAR_SEEDS};
use boostme_integration_tests::{registered_client, starter_plant_type};
use reqwest::StatusCode;

fn status_of(err: &ClientError) -> Option<StatusCode> {
    err.status()
}

#[tokio::test]
#[ignore = "Requires running server, database, and seeded catalog"]
async fn test_new_garden() {
    let (client, _) = registered_client().await;
    let garden = client.my_garden().await.unwrap();

    assert_eq!(garden.garden.level, 1);
    assert_eq!(garden.garden.xp, 0);
    assert_eq!(garden.garden.star_seeds, STARTING_STAR_SEEDS);
    assert!(garden.garden.needs_watering);
    assert!(garden.plants.is_empty());
    assert!(!garden.plant_types.is_empty());
}

#[tokio::test]
#[ignore = "Requires running server, database, and seeded catalog"]
async fn test_plant_debits_seeds_and_logs_activity() {
    let (client, _) = registered_client().await;
    let plant_type = starter_plant_type(&client).await;

    let planted = client
        .plant(plant_type.id, Some(Position { x: 0, y: 0 }))
        .await
        .unwrap();
    assert_eq!(planted.cost, plant_type.planting_cost());
    assert_eq!(planted.plant.stage, 0);
    assert_eq!(planted.plant.position, Some(Position { x: 0, y: 0 }));
    let achievement_seeds: i32 = planted
        .update
        .new_achievements
        .iter()
        .map(|a| a.star_seeds_reward)
        .sum();
    assert_eq!(
        planted.update.garden.star_seeds,
        STARTING_STAR_SEEDS - planted.cost + achievement_seeds
    );

    let err = client
        .plant(plant_type.id, Some(Position { x: 0, y: 0 }))
        .await
        .unwrap_err();
    assert_eq!(status_of(&err), Some(StatusCode::CONFLICT));

    let activities = client.activities(Some(5)).await.unwrap();
    assert!(activities.iter().any(|a| a.star_seeds_delta == -planted.cost));

    let stats = client.stats().await.unwrap();
    assert_eq!(stats.plants_planted, 1);
    assert_eq!(stats.active_plants, 1);
}

#[tokio::test]
#[ignore = "Requires running server, database, and seeded catalog"]
async fn test_insufficient_seeds() {
    let (client, _) = registered_client().await;
    let plant_type = starter_plant_type(&client).await;

    // Plant without positions until the balance runs out
    let mut last_err = None;
    for _ in 0..10 {
        if let Err(e) = client.plant(plant_type.id, None).await {
            last_err = Some(e);
            break;
        }
    }
    let err = last_err.expect("balance never ran out");
    assert!(matches!(
        &err,
        ClientError::Api { status, message }
            if *status == StatusCode::CONFLICT && message == "Star Seeds ไม่เพียงพอ"
    ));
}

#[tokio::test]
#[ignore = "Requires running server, database, and seeded catalog"]
async fn test_water_plant_cooldown() {
    let (client, _) = registered_client().await;
    let plant_type = starter_plant_type(&client).await;
    let planted = client.plant(plant_type.id, None).await.unwrap();

    let watered = client.water_plant(planted.plant.id).await.unwrap();
    assert!(watered.progress_gained > 0);
    assert_eq!(watered.plant.times_watered, 1);
    assert!(!watered.plant.needs_watering);

    let err = client.water_plant(planted.plant.id).await.unwrap_err();
    assert_eq!(status_of(&err), Some(StatusCode::CONFLICT));
}

#[tokio::test]
#[ignore = "Requires running server, database, and seeded catalog"]
async fn test_concurrent_watering_applies_once() {
    let (client, _) = registered_client().await;
    let plant_type = starter_plant_type(&client).await;
    let planted = client.plant(plant_type.id, None).await.unwrap();

    let (a, b) = tokio::join!(
        client.water_plant(planted.plant.id),
        client.water_plant(planted.plant.id)
    );
    assert_eq!(usize::from(a.is_ok()) + usize::from(b.is_ok()), 1);

    let garden = client.my_garden().await.unwrap();
    assert_eq!(garden.plants.first().unwrap().times_watered, 1);
}

#[tokio::test]
#[ignore = "Requires running server, database, and seeded catalog"]
async fn test_water_garden_once_per_day() {
    let (client, _) = registered_client().await;
    let plant_type = starter_plant_type(&client).await;
    client.plant(plant_type.id, None).await.unwrap();

    let first = client.water_garden().await.unwrap();
    assert_eq!(first.watered.len(), 1);
    assert_eq!(first.plants.len(), 1);
    assert!(first.reward.xp >= 15);
    assert!(!first.update.garden.needs_watering);

    let err = client.water_garden().await.unwrap_err();
    assert_eq!(status_of(&err), Some(StatusCode::CONFLICT));
}

#[tokio::test]
#[ignore = "Requires running server, database, and seeded catalog"]
async fn test_harvest_requires_grown_plant() {
    let (client, _) = registered_client().await;
    let plant_type = starter_plant_type(&client).await;
    let planted = client.plant(plant_type.id, None).await.unwrap();

    let err = client.harvest(planted.plant.id).await.unwrap_err();
    assert!(matches!(
        &err,
        ClientError::Api { status, message }
            if *status == StatusCode::CONFLICT && message == "ต้นไม้ยังไม่พร้อมเก็บเกี่ยว"
    ));

    let err = client
        .harvest(boostme_core::PlantId::new(i32::MAX))
        .await
        .unwrap_err();
    assert_eq!(status_of(&err), Some(StatusCode::NOT_FOUND));
}

#[tokio::test]
#[ignore = "Requires running server, database, and seeded catalog"]
async fn test_daily_challenges() {
    let (client, _) = registered_client().await;

    let challenges = client.challenges_today().await.unwrap();
    assert_eq!(challenges.len(), 3);
    // Same set on repeated reads
    let again = client.challenges_today().await.unwrap();
    assert_eq!(
        challenges.iter().map(|c| c.id).collect::<Vec<_>>(),
        again.iter().map(|c| c.id).collect::<Vec<_>>()
    );

    let challenge = challenges.first().unwrap();
    let err = client
        .progress_challenge(challenge.id, 0)
        .await
        .unwrap_err();
    assert_eq!(status_of(&err), Some(StatusCode::BAD_REQUEST));

    let done = client
        .progress_challenge(challenge.id, challenge.target)
        .await
        .unwrap();
    assert!(matches!(done.result, ChallengeUpdate::Completed { .. }));
    assert!(done.challenge.is_completed);
    assert_eq!(done.challenge.progress, challenge.target);

    let repeat = client.progress_challenge(challenge.id, 1).await.unwrap();
    assert_eq!(repeat.result, ChallengeUpdate::AlreadyCompleted);
    assert_eq!(repeat.update.garden.xp, done.update.garden.xp);
}

#[tokio::test]
#[ignore = "Requires running server, database, and seeded catalog"]
async fn test_themes() {
    let (client, _) = registered_client().await;

    let themes = client.themes().await.unwrap();
    assert!(themes.iter().any(|t| t.key == "default" && t.unlocked));

    let err = client.set_theme("sakura").await.unwrap_err();
    assert_eq!(status_of(&err), Some(StatusCode::CONFLICT));

    let err = client.set_theme("space").await.unwrap_err();
    assert_eq!(status_of(&err), Some(StatusCode::NOT_FOUND));

    let selected = client.set_theme("default").await.unwrap();
    assert_eq!(selected.update.garden.theme.as_deref(), Some("default"));
}

#[tokio::test]
#[ignore = "Requires running server, database, and seeded catalog"]
async fn test_achievements_listed() {
    let (client, _) = registered_client().await;
    let plant_type = starter_plant_type(&client).await;

    let before = client.achievements().await.unwrap();
    assert!(before.iter().all(|a| a.earned_at.is_none()));

    let first = before
        .iter()
        .find(|a| a.achievement.key == "first_plant")
        .expect("seeded catalog has a first_plant achievement");

    let planted = client.plant(plant_type.id, None).await.unwrap();
    assert!(
        planted
            .update
            .new_achievements
            .iter()
            .any(|a| a.id == first.achievement.id)
    );
    let after = client.achievements().await.unwrap();
    assert!(
        after
            .iter()
            .any(|a| a.achievement.id == first.achievement.id && a.earned_at.is_some())
    );
}

#[tokio::test]
#[ignore = "Requires running server, database, and seeded catalog"]
async fn test_session_tracks_server_state() {
    let (client, _) = registered_client().await;
    let plant_type = starter_plant_type(&client).await;
    let session = GardenSession::new(client);

    let snapshot = session.refresh().await.unwrap();
    assert!(snapshot.plants.is_empty());

    let planted = session.plant(plant_type.id, None).await.unwrap();
    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.plants.len(), 1);
    assert_eq!(snapshot.garden, planted.update.garden);

    session.water_plant(planted.plant.id).await.unwrap();
    let merged = session.snapshot().await.unwrap();
    let fresh = session.refresh().await.unwrap();
    assert_eq!(merged.garden.xp, fresh.garden.xp);
    assert_eq!(merged.garden.star_seeds, fresh.garden.star_seeds);
    assert_eq!(
        merged.plants.first().unwrap().times_watered,
        fresh.plants.first().unwrap().times_watered
    );
}
