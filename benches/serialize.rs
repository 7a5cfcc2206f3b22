//! This bench serialises a large family record, with every child married and
//! carrying several grandchildren, to CSV.

#![allow(missing_docs)]

use chrono::NaiveDate;
use criterion::{criterion_group, criterion_main, Criterion};
use family_record::{
    domain::{ChildUpdate, SpouseUpdate},
    serialize, FamilyData, MaritalStatus, Occupation, PersonUpdate,
};

fn person(name: String) -> PersonUpdate {
    PersonUpdate::default()
        .name(name)
        .dob(NaiveDate::from_ymd_opt(1980, 7, 14).unwrap())
        .occupation("Engineer, \"civil\"".parse::<Occupation>().unwrap())
        .phone_number("+91 98765 43210")
}

/// Generates a record with many children, spouses and grandchildren
fn large_family() -> FamilyData {
    let mut data = FamilyData::default().update_head(&person("HEAD".to_string()));
    for child in 0..200 {
        data = data.add_child();
        let update = ChildUpdate {
            person: person(format!("CHILD {child}")),
            additional_phone_numbers: Some(vec!["020 555 0101".into(), "020 555 0102".into()]),
            marital_status: Some(MaritalStatus::Married),
        };
        data = data.update_child(child, &update).unwrap();
        data = data
            .update_spouse(child, &SpouseUpdate::from(person(format!("SPOUSE {child}"))))
            .unwrap();
        for grandchild in 0..5 {
            data = data.add_grandchild(child).unwrap();
            data = data
                .update_grandchild(child, grandchild, &person(format!("GRANDCHILD {grandchild}")))
                .unwrap();
        }
    }
    data
}

fn serialize_large_family(c: &mut Criterion) {
    let data = large_family();
    c.bench_function("serialize large family", |b| {
        b.iter(|| serialize(std::hint::black_box(&data)));
    });
}

criterion_group!(benches, serialize_large_family);
criterion_main!(benches);
