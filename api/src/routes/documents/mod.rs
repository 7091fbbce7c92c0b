pub mod delete_document_route;
pub mod list_documents_route;
pub mod upload_document_route;
