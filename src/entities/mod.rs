pub mod comment;
pub mod gallery;

// Gallery entities
pub use gallery::{
    ActiveModel as GalleryActiveModel, Column as GalleryColumn, Entity as GalleryEntity,
    Model as GalleryModel, Relation as GalleryRelation,
};

// Comment entities
pub use comment::{
    ActiveModel as CommentActiveModel, Column as CommentColumn, Entity as CommentEntity,
    Model as CommentModel, Relation as CommentRelation,
};

pub mod prelude {
    pub use super::comment::Entity as Comment;
    pub use super::gallery::Entity as Gallery;
}
