use error::PostError;
use model::{self, Direction, NewPost, Post, PostUpdate, SortField};

/// The in-memory collection of posts, kept in insertion order
/// until a listing asks for a sort.
#[derive(Clone, Debug)]
pub struct PostStore {
    posts: Vec<Post>,
    next_id: u64,
}

impl PostStore {
    pub fn new() -> PostStore {
        PostStore {
            posts: vec![],
            next_id: 1,
        }
    }

    /// A store holding the two posts the service starts with.
    pub fn seeded() -> PostStore {
        let mut store = PostStore::new();
        store.create_post(NewPost {
            title: "First post".to_string(),
            content: "This is the first post.".to_string(),
        });
        store.create_post(NewPost {
            title: "Second post".to_string(),
            content: "This is the second post.".to_string(),
        });
        store
    }

    #[cfg(test)]
    pub fn posts(&self) -> &Vec<Post> {
        &self.posts
    }

    /// List every post. When both `sort_by` and `direction` are given the
    /// collection is reordered in place and stays that way.
    pub fn list_posts(&mut self,
                      sort_by: Option<SortField>,
                      direction: Option<Direction>)
                      -> &Vec<Post> {
        if let (Some(field), Some(direction)) = (sort_by, direction) {
            self.posts.sort_by(|a, b| model::compare(a, b, field, direction));
        }
        &self.posts
    }

    pub fn search_posts(&self, title_query: &str, content_query: &str) -> Vec<Post> {
        self.posts
            .iter()
            .filter(|post| post.matches(title_query, content_query))
            .cloned()
            .collect()
    }

    pub fn create_post(&mut self, new_post: NewPost) -> Post {
        let post = Post::new(self.next_id, &new_post.title, &new_post.content);
        self.next_id += 1;
        self.posts.push(post.clone());
        post
    }

    pub fn update_post(&mut self, id: u64, update: PostUpdate) -> Result<Post, PostError> {
        let post = self.posts
            .iter_mut()
            .find(|post| post.id == id)
            .ok_or(PostError::NotFound)?;
        post.apply(update);
        Ok(post.clone())
    }

    pub fn delete_post(&mut self, id: u64) -> Result<Post, PostError> {
        let index = self.posts
            .iter()
            .position(|post| post.id == id)
            .ok_or(PostError::NotFound)?;
        Ok(self.posts.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use error::PostError;
    use model::{Direction, NewPost, PostUpdate, SortField};

    fn new_post(title: &str, content: &str) -> NewPost {
        NewPost {
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    fn ids(posts: &[Post]) -> Vec<u64> {
        posts.iter().map(|post| post.id).collect()
    }

    fn titles(posts: &[Post]) -> Vec<&str> {
        posts.iter().map(|post| post.title.as_str()).collect()
    }

    #[test]
    fn seeded_store_holds_two_posts() {
        let store = PostStore::seeded();
        assert_eq!(ids(store.posts()), vec![1, 2]);
        assert_eq!(titles(store.posts()), vec!["First post", "Second post"]);
    }

    #[test]
    fn created_posts_get_fresh_ids() {
        let mut store = PostStore::seeded();
        let third = store.create_post(new_post("Third", "3"));
        assert_eq!(third.id, 3);

        store.delete_post(3).unwrap();
        let fourth = store.create_post(new_post("Fourth", "4"));
        assert_eq!(fourth.id, 4);
        assert_eq!(ids(store.posts()), vec![1, 2, 4]);
    }

    #[test]
    fn sort_persists_across_listings() {
        let mut store = PostStore::seeded();
        store.create_post(new_post("apple", "b"));
        store.create_post(new_post("Banana", "a"));

        let sorted = ids(store.list_posts(Some(SortField::Title), Some(Direction::Desc)));
        assert_eq!(sorted, vec![3, 2, 1, 4]);
        assert_eq!(ids(store.list_posts(None, None)), sorted);

        let by_content = ids(store.list_posts(Some(SortField::Content), Some(Direction::Asc)));
        assert_eq!(by_content, vec![1, 2, 4, 3]);
    }

    #[test]
    fn one_sort_parameter_does_nothing() {
        let mut store = PostStore::seeded();
        assert_eq!(ids(store.list_posts(Some(SortField::Title), None)), vec![1, 2]);
        assert_eq!(ids(store.list_posts(None, Some(Direction::Desc))), vec![1, 2]);
    }

    #[test]
    fn sort_is_stable() {
        let mut store = PostStore::new();
        store.create_post(new_post("same", "x"));
        store.create_post(new_post("same", "y"));
        store.create_post(new_post("other", "z"));

        assert_eq!(ids(store.list_posts(Some(SortField::Title), Some(Direction::Desc))),
                   vec![1, 2, 3]);
        assert_eq!(ids(store.list_posts(Some(SortField::Title), Some(Direction::Asc))),
                   vec![3, 1, 2]);
    }

    #[test]
    fn search_matches_either_field() {
        let store = PostStore::seeded();
        assert_eq!(ids(&store.search_posts("", "")), vec![1, 2]);
        assert_eq!(ids(&store.search_posts("SECOND", "nope")), vec![2]);
        assert_eq!(ids(&store.search_posts("nope", "first post")), vec![1]);
        assert!(store.search_posts("nope", "nope").is_empty());
    }

    #[test]
    fn update_is_partial() {
        let mut store = PostStore::seeded();
        let update = PostUpdate {
            title: Some("Edited".to_string()),
            content: None,
        };
        let post = store.update_post(1, update).unwrap();
        assert_eq!(post.title, "Edited");
        assert_eq!(post.content, "This is the first post.");
        assert_eq!(store.posts()[0], post);
    }

    #[test]
    fn update_and_delete_report_missing_posts() {
        let mut store = PostStore::seeded();
        assert_eq!(store.update_post(9, PostUpdate::default()),
                   Err(PostError::NotFound));
        assert_eq!(store.delete_post(9), Err(PostError::NotFound));
        assert_eq!(ids(store.posts()), vec![1, 2]);
    }

    #[test]
    fn delete_removes_one_post() {
        let mut store = PostStore::seeded();
        let removed = store.delete_post(1).unwrap();
        assert_eq!(removed.title, "First post");
        assert_eq!(ids(store.posts()), vec![2]);
    }
}
