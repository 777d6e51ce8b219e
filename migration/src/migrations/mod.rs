pub mod m202607150001_create_users;
pub mod m202607150002_create_classes;
pub mod m202607150003_create_class_roles;
pub mod m202607150004_create_class_sessions;
pub mod m202607200001_create_attendance;
