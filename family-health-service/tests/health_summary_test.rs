//! Dashboard summary tests.

mod common;

use chrono::{Duration, NaiveDate, Utc};
use common::TestApp;
use reqwest::Client;
use serde_json::Value;

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn summary_counts_and_previews() {
    let app = TestApp::spawn().await;
    let maya = app.insert_person("Maya", "human").await;
    let biscuit = app.insert_person("Biscuit", "dog").await;

    app.insert_allergy(maya, "Peanuts", "severe").await;
    app.insert_medication(maya, "Cetirizine", true).await;
    app.insert_medication(maya, "Amoxicillin", false).await;

    let today = Utc::now().date_naive();
    for offset in 0..7 {
        app.insert_reminder(
            biscuit,
            &format!("Walk log {}", offset),
            today + Duration::days(offset),
            "none",
        )
        .await;
    }
    app.insert_reminder(maya, "Overdue refill", NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid date"), "none")
        .await;

    app.insert_vaccine(biscuit, "Rabies", today - Duration::days(1085), Some(today + Duration::days(10)))
        .await;
    app.insert_vaccine(maya, "Tdap", today - Duration::days(3600), Some(today + Duration::days(60)))
        .await;

    app.insert_appointment(biscuit, Utc::now() + Duration::days(3), "Annual checkup")
        .await;
    app.insert_appointment(biscuit, Utc::now() - Duration::days(3), "Past visit")
        .await;

    let body: Value = Client::new()
        .get(app.url("/api/health-summary"))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse JSON");

    let counts = &body["counts"];
    assert_eq!(counts["family_members"], 2);
    assert_eq!(counts["humans"], 1);
    assert_eq!(counts["pets"], 1);
    assert_eq!(counts["allergies"], 1);
    assert_eq!(counts["active_medications"], 1);
    assert_eq!(counts["vaccines"], 2);
    assert_eq!(counts["vaccines_due_soon"], 1);
    assert_eq!(counts["pending_reminders"], 8);
    assert_eq!(counts["overdue_reminders"], 1);
    assert_eq!(counts["upcoming_appointments"], 1);

    let reminders = body["upcoming_reminders"].as_array().expect("reminders");
    assert_eq!(reminders.len(), 5);
    assert_eq!(reminders[0]["title"], "Overdue refill");

    let appointments = body["upcoming_appointments"].as_array().expect("appointments");
    assert_eq!(appointments.len(), 1);
    assert_eq!(appointments[0]["reason"], "Annual checkup");
    assert_eq!(appointments[0]["doctor_name"], "Dr. Patel");
    assert_eq!(appointments[0]["clinic_name"], "Maple Vet");

    app.cleanup().await;
}
