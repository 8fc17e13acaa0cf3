// ABOUTME: Criterion benchmarks for exercise history algorithms
// ABOUTME: Measures detail extraction, history aggregation, and fatigue decay over growing histories
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Criterion benchmarks for the exercise history algorithms.
//!
//! Histories are generated deterministically: one session every other day, four exercises
//! per session drawn from a fixed rotation.

#![allow(clippy::missing_docs_in_private_items, missing_docs)]

use chrono::{Duration, NaiveDate, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use liftlog::intelligence::{
    aggregate_history, compute_muscle_fatigue, extract_session_records, AggregationOptions,
    RecoveryHours,
};
use liftlog::models::{
    ExerciseDetail, MappingSet, MuscleMapping, SessionRecord, SessionStub, SetDetail,
    TrainingDetail,
};
use std::collections::HashMap;

const EXERCISES: [(&str, &str, Option<&str>); 8] = [
    ("Back Squat", "Quadriceps", Some("Glutes")),
    ("Bench Press", "Chest", Some("Triceps")),
    ("Deadlift", "Hamstrings", Some("Back")),
    ("Overhead Press", "Shoulders", Some("Triceps")),
    ("Seated Row", "Back", Some("Biceps")),
    ("Lunge", "Quadriceps", None),
    ("Biceps Curl", "Biceps", None),
    ("Lat Pulldown", "Back", Some("Biceps")),
];

#[allow(clippy::cast_precision_loss)]
fn detail_payload(sets: usize) -> TrainingDetail {
    let exercises = EXERCISES
        .iter()
        .map(|(name, _, _)| ExerciseDetail {
            action_library_name: Some((*name).to_owned()),
            name: None,
            finished_reps: Some(
                (0..sets)
                    .map(|set| SetDetail {
                        capacity: 400.0 + set as f64 * 10.0,
                        finished_count: 8.0,
                        target_count: 8.0,
                        weight: 50.0,
                        timestamp: None,
                    })
                    .collect(),
            ),
        })
        .collect();
    TrainingDetail::with_exercises(exercises)
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_wrap)]
fn generate_records(sessions: usize, today: NaiveDate) -> Vec<SessionRecord> {
    (0..sessions)
        .flat_map(|index| {
            let date = today - Duration::days((index * 2) as i64);
            (0..4).map(move |slot| {
                let (name, _, _) = EXERCISES[(index + slot) % EXERCISES.len()];
                SessionRecord {
                    session_id: (index as u64 + 1).into(),
                    date,
                    finish_timestamp: date.and_hms_opt(18, 0, 0).map(|dt| dt.and_utc()),
                    volume_kg: 1_500.0 + ((index * 37) % 900) as f64,
                    max_weight_kg: 40.0 + ((index * 11) % 60) as f64,
                    exercise_name: name.to_owned(),
                }
            })
        })
        .collect()
}

fn mapping() -> MappingSet {
    MappingSet {
        muscles: EXERCISES
            .iter()
            .map(|&(name, primary, secondary)| {
                let muscles = MuscleMapping::primary(primary);
                let muscles = match secondary {
                    Some(secondary) => muscles.with_secondary(secondary, 40.0),
                    None => muscles,
                };
                (name.to_owned(), muscles)
            })
            .collect(),
        handle_types: HashMap::new(),
    }
}

fn bench_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("extraction");
    let stub = SessionStub::completed(1_u64, Utc::now().date_naive());

    for sets in [3, 10, 30] {
        let payload = detail_payload(sets);
        group.bench_with_input(
            BenchmarkId::new("extract_session_records", sets),
            &payload,
            |b, payload| b.iter(|| extract_session_records(black_box(&stub), black_box(payload))),
        );
    }

    group.finish();
}

fn bench_aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregation");
    let today = Utc::now().date_naive();
    let options = AggregationOptions::new(today);

    for sessions in [20, 200, 1_000] {
        let records = generate_records(sessions, today);
        group.throughput(Throughput::Elements(records.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("aggregate_history", sessions),
            &records,
            |b, records| b.iter(|| aggregate_history(black_box(records), black_box(&options))),
        );
    }

    group.finish();
}

fn bench_fatigue(c: &mut Criterion) {
    let mut group = c.benchmark_group("fatigue");
    let now = Utc::now();
    let today = now.date_naive();
    let mapping = mapping();
    let options = AggregationOptions::new(today).without_active_window();

    for sessions in [20, 200, 1_000] {
        let aggregate = aggregate_history(&generate_records(sessions, today), &options);
        group.bench_with_input(
            BenchmarkId::new("compute_muscle_fatigue", sessions),
            &aggregate,
            |b, aggregate| {
                b.iter(|| {
                    compute_muscle_fatigue(
                        black_box(&aggregate.exercise_daily),
                        black_box(&aggregate.exercise_last_time),
                        black_box(&mapping),
                        RecoveryHours::default(),
                        now,
                    )
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_extraction, bench_aggregation, bench_fatigue);
criterion_main!(benches);
