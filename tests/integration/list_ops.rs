//! List management as seen from outside the crate.

use pdfjoin::io::SelectedFile;
use pdfjoin::list::{FileList, ListView};

use crate::common::pdf_file;

fn names(list: &FileList) -> Vec<&str> {
    list.files().iter().map(SelectedFile::name).collect()
}

#[test]
fn test_admission_and_order() {
    let mut list = FileList::new();
    let report = list.add(vec![
        pdf_file("a", 1),
        SelectedFile::from_bytes("photo.jpg", Some("image/jpeg"), vec![0xffu8, 0xd8]),
        SelectedFile::from_bytes("SCAN.PDF", None, vec![1u8]),
        SelectedFile::from_bytes("blob", Some("application/pdf"), vec![2u8]),
    ]);

    assert_eq!(report.admitted, 3);
    assert_eq!(report.rejected, 1);
    assert_eq!(names(&list), vec!["a.pdf", "SCAN.PDF", "blob"]);
}

#[test]
fn test_reorder_then_render() {
    let mut list = FileList::new();
    list.add(vec![pdf_file("a", 1), pdf_file("b", 1), pdf_file("c", 1)]);

    assert!(list.move_up(2));
    assert!(!list.move_up(0));
    assert!(!list.move_down(2));
    assert!(list.remove(0).is_some());

    let view = ListView::render(&list, false);
    let positions: Vec<(usize, &str)> = view
        .rows
        .iter()
        .map(|row| (row.position, row.name.as_str()))
        .collect();
    assert_eq!(positions, vec![(1, "c.pdf"), (2, "b.pdf")]);
    assert!(view.rows[0].can_move_down && !view.rows[0].can_move_up);
    assert!(view.rows[1].can_move_up && !view.rows[1].can_move_down);
}

#[test]
fn test_view_serializes_for_display() {
    let mut list = FileList::new();
    list.add([SelectedFile::from_bytes("a.pdf", None, vec![0u8; 3000])]);

    let json = serde_json::to_value(ListView::render(&list, false)).unwrap();
    assert_eq!(json["rows"][0]["sizeKb"], 3);
    assert_eq!(json["rows"][0]["canMoveUp"], false);
    assert_eq!(json["mergeEnabled"], true);
}
