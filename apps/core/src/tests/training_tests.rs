//! Training Data Tests

use crate::models::Item;
use crate::training::*;
use tempfile::TempDir;

fn items() -> Vec<Item> {
    let mut items: Vec<Item> = (0..7)
        .map(|i| Item::new("hn", format!("g{}", i), format!("Title {}", i)).judged(i % 2 == 0))
        .collect();
    items.insert(3, Item::new("hn", "unjudged-a", "Not yet read"));
    items.push(Item::new("hn", "unjudged-b", "Also unread"));
    items
}

#[test]
fn test_lines_are_labeled_feed_and_title() {
    let set = TrainingSet::from_items(&items());

    assert_eq!(set.all[0], "__label__1 hn Title 0\n");
    assert_eq!(set.all[1], "__label__0 hn Title 1\n");
}

#[test]
fn test_every_fifth_judged_item_is_held_out() {
    let set = TrainingSet::from_items(&items());

    assert_eq!(set.all.len(), 7);
    assert_eq!(set.test, vec![set.all[0].clone(), set.all[5].clone()]);
    assert_eq!(set.training.len(), 5);
    assert!(!set.training.contains(&set.all[0]));
    assert!(set.training.contains(&set.all[4]));
    assert!(set.all.iter().all(|line| !line.contains("unread") && !line.contains("Not yet")));
}

#[test]
fn test_no_judgements_means_empty_set() {
    let set = TrainingSet::from_items(&[Item::new("hn", "1", "unread")]);

    assert!(set.is_empty());
    assert!(set.test.is_empty());
}

#[test]
fn test_titles_with_newlines_stay_on_one_line() {
    let item = Item::new("hn", "1", "Two\nlines").judged(true);
    let set = TrainingSet::from_items([&item]);

    assert_eq!(set.all, vec!["__label__1 hn Two lines\n".to_string()]);
}

#[tokio::test]
async fn test_write_to_dir_creates_all_three_files() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("training");
    let set = TrainingSet::from_items(&items());

    set.write_to_dir(&out).await.unwrap();

    let data = tokio::fs::read_to_string(out.join(DATA_FILENAME)).await.unwrap();
    let training = tokio::fs::read_to_string(out.join(TRAINING_DATA_FILENAME)).await.unwrap();
    let test = tokio::fs::read_to_string(out.join(TEST_DATA_FILENAME)).await.unwrap();

    assert_eq!(data.lines().count(), 7);
    assert_eq!(training.lines().count(), 5);
    assert_eq!(test.lines().count(), 2);
    assert!(test.starts_with("__label__1 hn Title 0\n"));
}
