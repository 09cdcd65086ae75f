/// #[derive(Entity)] tests
///
/// Run with: cargo test --test derive_tests
use rowbind::{DbError, EXCLUDE_TAG, Entity, FieldDecl, FieldKind, Mapped, TypeShape, Value};

#[derive(Debug, Default, Entity)]
struct UserProfile {
    id: u32,
    #[db(name = "display_name")]
    display: String,
    #[db(column = "-")]
    scratch: Vec<String>,
    #[db(skip)]
    session: Option<Vec<u8>>,
    rating: f32,
    verified: bool,
    #[db(format = "%d.%m.%Y")]
    joined: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Default, Entity)]
#[entity(table = "audit_log")]
struct AuditEntry {
    #[db(column = "entry_id")]
    id: i64,
    message: Option<String>,
}

#[derive(Debug, Default, Entity)]
struct Attachment {
    id: i64,
    #[db(other)]
    body: Vec<u8>,
    #[db(other, column = "meta")]
    labels: std::collections::BTreeSet<String>,
}

#[test]
fn test_default_table_name_is_snake_case() {
    assert_eq!(UserProfile::table_name(), "user_profile");
    assert_eq!(AuditEntry::table_name(), "audit_log");
}

#[test]
fn test_declared_fields() {
    let fields = UserProfile::declared_fields();

    assert_eq!(
        fields,
        vec![
            FieldDecl::new("id", FieldKind::Integer),
            FieldDecl::new("display", FieldKind::String).tag("display_name"),
            FieldDecl::new("scratch", FieldKind::Other).tag(EXCLUDE_TAG),
            FieldDecl::new("session", FieldKind::Other).tag(EXCLUDE_TAG),
            FieldDecl::new("rating", FieldKind::Float),
            FieldDecl::new("verified", FieldKind::Boolean),
            FieldDecl::new("joined", FieldKind::Timestamp).format("%d.%m.%Y"),
        ]
    );
}

#[test]
fn test_optional_fields_keep_inner_kind() {
    let fields = AuditEntry::declared_fields();

    assert_eq!(fields[0].column(), Some("entry_id"));
    assert_eq!(fields[1].kind, FieldKind::String);
    assert_eq!(fields[1].column(), Some("message"));
}

#[test]
fn test_shape_is_a_record() {
    match AuditEntry::shape() {
        TypeShape::Record(record) => {
            assert_eq!(record.table_name, "audit_log");
            assert_eq!((record.declared_fields)().len(), 2);
        }
        other => panic!("expected a record shape, got {:?}", other),
    }
}

#[test]
fn test_assign_by_logical_name() {
    let mut entry = AuditEntry::default();

    entry.assign("id", Value::Integer(5)).unwrap();
    entry.assign("message", Value::from("hello")).unwrap();
    assert_eq!(entry.id, 5);
    assert_eq!(entry.message.as_deref(), Some("hello"));

    entry.assign("message", Value::Null).unwrap();
    assert_eq!(entry.message, None);
}

#[test]
fn test_assign_rejects_unknown_and_excluded_fields() {
    let mut profile = UserProfile::default();

    let err = profile.assign("entry_id", Value::Integer(1)).unwrap_err();
    assert!(matches!(err, DbError::UnknownField { ref field, .. } if field == "entry_id"));

    let err = profile.assign("session", Value::Null).unwrap_err();
    assert!(matches!(err, DbError::UnknownField { .. }));
    assert!(profile.session.is_none());
    assert!(profile.scratch.is_empty());
}

#[test]
fn test_assign_type_mismatch() {
    let mut profile = UserProfile::default();

    assert!(matches!(
        profile.assign("id", Value::Integer(-1)),
        Err(DbError::TypeMismatch(_))
    ));
    assert!(matches!(
        profile.assign("verified", Value::from("yes")),
        Err(DbError::TypeMismatch(_))
    ));

    profile.assign("rating", Value::Integer(4)).unwrap();
    assert_eq!(profile.rating, 4.0);
    assert!(!profile.verified);
    assert_eq!(profile.display, "");
    assert_eq!(profile.joined, chrono::DateTime::<chrono::Utc>::default());
}

#[test]
fn test_other_fields_are_declared_but_not_assignable() {
    assert_eq!(
        Attachment::declared_fields(),
        vec![
            FieldDecl::new("id", FieldKind::Integer),
            FieldDecl::new("body", FieldKind::Other),
            FieldDecl::new("labels", FieldKind::Other).tag("meta"),
        ]
    );

    let mut attachment = Attachment::default();
    attachment.assign("id", Value::Integer(3)).unwrap();
    let err = attachment.assign("body", Value::from("raw")).unwrap_err();

    assert!(matches!(err, DbError::UnknownField { ref field, .. } if field == "body"));
    assert_eq!(attachment.id, 3);
    assert!(attachment.body.is_empty() && attachment.labels.is_empty());
}
