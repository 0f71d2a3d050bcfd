// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Independent connections booking against one database file.

use super::{book, create_test_date, create_test_student, open_pool};
use crate::{Persistence, PersistenceError, PoolCommandOutcome};
use canteen_domain::AllocationPolicy;
use std::path::PathBuf;
use std::thread;

struct TempDatabase {
    path: PathBuf,
}

impl TempDatabase {
    fn new() -> Self {
        let path: PathBuf =
            std::env::temp_dir().join(format!("canteen-test-{}.db", uuid::Uuid::new_v4()));
        Self { path }
    }
}

impl Drop for TempDatabase {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut file = self.path.clone().into_os_string();
            file.push(suffix);
            let _ = std::fs::remove_file(file);
        }
    }
}

#[test]
fn test_concurrent_bookings_never_over_allocate() {
    let db = TempDatabase::new();

    let mut setup = Persistence::new_with_file(&db.path).unwrap();
    let students: Vec<String> = (0..4)
        .map(|i| create_test_student(&mut setup, &format!("s{i}@college.edu")))
        .collect();
    open_pool(&mut setup, 5);

    // Open every connection before any thread starts so migrations never race.
    let connections: Vec<(Persistence, String)> = students
        .into_iter()
        .map(|student| (Persistence::new_with_file(&db.path).unwrap(), student))
        .collect();

    let handles: Vec<thread::JoinHandle<Result<PoolCommandOutcome, PersistenceError>>> =
        connections
            .into_iter()
            .map(|(mut persistence, student)| {
                thread::spawn(move || {
                    book(&mut persistence, &student, 2, AllocationPolicy::Partial)
                })
            })
            .collect();

    let mut granted: usize = 0;
    for handle in handles {
        match handle.join().unwrap() {
            Ok(outcome) => granted += outcome.affected_bookings.len(),
            Err(PersistenceError::CommandRejected(_)) => {}
            Err(other) => panic!("unexpected failure: {other}"),
        }
    }

    let mut numbers: Vec<u32> = setup
        .list_bookings_for_date(create_test_date())
        .unwrap()
        .iter()
        .map(|b| b.token_number)
        .collect();
    numbers.sort_unstable();

    assert_eq!(granted, 5);
    assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
}
