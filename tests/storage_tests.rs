use blogsmith::Theme;
use blogsmith::profile::{BusinessInfo, StyleProfile};
use blogsmith::storage::{NewPost, Storage};
use spectral::prelude::*;
use tempfile::{TempDir, tempdir};

fn open_storage() -> (TempDir, Storage) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("blogsmith.db");
    let storage = Storage::new(path.to_str().unwrap()).unwrap();
    (dir, storage)
}

fn new_post(project_id: i64, title: &str) -> NewPost {
    NewPost {
        project_id,
        title: title.to_owned(),
        raw_content: format!("# {title}"),
        html_content: format!("<h2>{title}</h2>"),
        meta_description: None,
    }
}

#[test]
fn created_project_is_empty() {
    let (_dir, storage) = open_storage();

    let id = storage.create_project("Acme", Some("Company blog")).unwrap();
    let project = storage.get_project(id).unwrap().unwrap();

    assert_that(&project.name.as_str()).is_equal_to("Acme");
    assert_that(&project.description).is_equal_to(Some("Company blog".to_owned()));
    assert_that(&project.theme).is_equal_to(Theme::Default);
    assert_that(&project.style_profile).is_none();
    assert_that(&project.blog_template).is_none();
}

#[test]
fn unknown_ids_are_none() {
    let (_dir, storage) = open_storage();

    assert_that(&storage.get_project(42).unwrap()).is_none();
    assert_that(&storage.get_post(42).unwrap()).is_none();
    assert_that(&storage.delete_post(42).unwrap()).is_false();
    assert_that(&storage.delete_project(42).unwrap()).is_false();
}

#[test]
fn project_update_round_trips_profile_and_theme() {
    let (_dir, storage) = open_storage();
    let id = storage.create_project("Acme", None).unwrap();
    let mut project = storage.get_project(id).unwrap().unwrap();
    let mut profile = StyleProfile::default().with_business(BusinessInfo::fallback("Sell"));
    profile.layout.header_bg_color = Some("#111".to_owned());
    project.style_profile = Some(profile.clone());
    project.theme = Theme::DarkGaming;
    project.hosted_css_filename = Some(format!("{id}_1690000000.css"));
    project.blog_template = Some("<!-- BLOG_POSTS_PLACEHOLDER -->".to_owned());

    storage.update_project(&project).unwrap();
    let stored = storage.get_project(id).unwrap().unwrap();

    assert_that(&stored.style_profile).is_equal_to(Some(profile));
    assert_that(&stored.theme).is_equal_to(Theme::DarkGaming);
    assert_that(&stored.hosted_css_filename).is_equal_to(Some(format!("{id}_1690000000.css")));
    assert_that(&stored.blog_template).is_equal_to(project.blog_template);
}

#[test]
fn projects_are_listed_oldest_first() {
    let (_dir, storage) = open_storage();
    storage.create_project("First", None).unwrap();
    storage.create_project("Second", None).unwrap();

    let names: Vec<String> = storage
        .list_projects()
        .unwrap()
        .into_iter()
        .map(|project| project.name)
        .collect();

    assert_that(&names).is_equal_to(vec!["First".to_owned(), "Second".to_owned()]);
}

#[test]
fn posts_are_listed_in_creation_order() {
    let (_dir, storage) = open_storage();
    let project = storage.create_project("Acme", None).unwrap();
    let other = storage.create_project("Other", None).unwrap();
    storage.insert_post(&new_post(project, "One")).unwrap();
    storage.insert_post(&new_post(other, "Elsewhere")).unwrap();
    storage.insert_post(&new_post(project, "Two")).unwrap();

    let titles: Vec<String> = storage
        .list_posts(project)
        .unwrap()
        .into_iter()
        .map(|post| post.title)
        .collect();

    assert_that(&titles).is_equal_to(vec!["One".to_owned(), "Two".to_owned()]);
}

#[test]
fn post_update_replaces_fields() {
    let (_dir, storage) = open_storage();
    let project = storage.create_project("Acme", None).unwrap();
    let id = storage.insert_post(&new_post(project, "Draft")).unwrap();
    let mut post = storage.get_post(id).unwrap().unwrap();
    post.title = "Final".to_owned();
    post.meta_description = Some("Short summary".to_owned());

    storage.update_post(&post).unwrap();
    let stored = storage.get_post(id).unwrap().unwrap();

    assert_that(&stored.title.as_str()).is_equal_to("Final");
    assert_that(&stored.meta_description).is_equal_to(Some("Short summary".to_owned()));
    assert_that(&stored.updated_at).is_greater_than_or_equal_to(stored.created_at);
}

#[test]
fn deleting_a_project_removes_its_posts() {
    let (_dir, storage) = open_storage();
    let project = storage.create_project("Acme", None).unwrap();
    let post = storage.insert_post(&new_post(project, "One")).unwrap();

    assert_that(&storage.delete_project(project).unwrap()).is_true();

    assert_that(&storage.get_post(post).unwrap()).is_none();
    assert_that(&storage.list_posts(project).unwrap()).is_empty();
}

#[test]
fn posts_require_an_existing_project() {
    let (_dir, storage) = open_storage();

    assert_that(&storage.insert_post(&new_post(99, "Orphan")).is_err()).is_true();
}

#[test]
fn reopening_keeps_data() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("blogsmith.db");
    let id = Storage::new(path.to_str().unwrap())
        .unwrap()
        .create_project("Acme", None)
        .unwrap();

    let storage = Storage::new(path.to_str().unwrap()).unwrap();

    assert_that(&storage.get_project(id).unwrap().map(|project| project.name))
        .is_equal_to(Some("Acme".to_owned()));
}
