//! OpenAPI document for every mounted resource.
//!
//! The handlers are generic, so operations are assembled with utoipa's
//! builders from each resource's constants rather than per-handler macros.

use utoipa::{
    IntoParams, ToSchema,
    openapi::{
        ComponentsBuilder, ContentBuilder, InfoBuilder, KnownFormat, ObjectBuilder, OpenApi,
        OpenApiBuilder, Paths, Ref, RefOr, Required, ResponseBuilder, Schema, SchemaFormat, Type,
        path::{HttpMethod, OperationBuilder, Parameter, ParameterBuilder, ParameterIn},
        request_body::RequestBodyBuilder,
        schema::ArrayBuilder,
    },
};

use crate::entities::{Category, Customer, Order, OrderItem, Product};
use crate::models::{KeywordParams, PageParams};
use crate::traits::{Completion, Repository};
use crate::upload::{UPLOAD_PATH, UploadedFile};

pub const DOCS_PATH: &str = "/swagger/v1/swagger.json";

const JSON: &str = "application/json";

fn string_schema() -> ObjectBuilder {
    ObjectBuilder::new().schema_type(Type::String)
}

fn integer_schema() -> ObjectBuilder {
    ObjectBuilder::new()
        .schema_type(Type::Integer)
        .format(Some(SchemaFormat::KnownFormat(KnownFormat::Int64)))
}

/// The envelope around `data`, or around nothing for error responses.
fn envelope_schema(data: Option<RefOr<Schema>>) -> Schema {
    let mut envelope = ObjectBuilder::new()
        .property("success", ObjectBuilder::new().schema_type(Type::Boolean))
        .property("errors", ArrayBuilder::new().items(string_schema()))
        .property("message", string_schema())
        .property("status", integer_schema())
        .property("totalData", integer_schema())
        .required("success")
        .required("errors")
        .required("message")
        .required("status")
        .required("totalData");
    if let Some(data) = data {
        envelope = envelope.property("data", data);
    }
    envelope.into()
}

fn schema_ref(name: &str) -> RefOr<Schema> {
    Ref::from_schema_name(name).into()
}

fn list_of(name: &str) -> RefOr<Schema> {
    ArrayBuilder::new().items(Ref::from_schema_name(name)).into()
}

fn envelope_response(description: &str, data: Option<RefOr<Schema>>) -> utoipa::openapi::Response {
    ResponseBuilder::new()
        .description(description)
        .content(
            JSON,
            ContentBuilder::new()
                .schema(Some(envelope_schema(data)))
                .build(),
        )
        .build()
}

fn accept_language() -> Parameter {
    ParameterBuilder::new()
        .name("Accept-Language")
        .parameter_in(ParameterIn::Header)
        .required(Required::False)
        .description(Some("Preferred response language, e.g. `en` or `ar`"))
        .schema(Some(string_schema()))
        .build()
}

fn path_id(name: &str) -> Parameter {
    ParameterBuilder::new()
        .name(name)
        .parameter_in(ParameterIn::Path)
        .required(Required::True)
        .schema(Some(
            ObjectBuilder::new()
                .schema_type(Type::Integer)
                .format(Some(SchemaFormat::KnownFormat(KnownFormat::Int32))),
        ))
        .build()
}

fn operation(tag: &str, id: String, summary: String) -> OperationBuilder {
    OperationBuilder::new()
        .tag(tag)
        .operation_id(Some(id))
        .summary(Some(summary))
        .parameter(accept_language())
}

fn json_body(schema: &str) -> utoipa::openapi::request_body::RequestBody {
    RequestBodyBuilder::new()
        .content(
            JSON,
            ContentBuilder::new().schema(Some(schema_ref(schema))).build(),
        )
        .required(Some(Required::True))
        .build()
}

fn completion_response(completion: Completion, description: &str, entity: &str) -> (&'static str, utoipa::openapi::Response) {
    match completion {
        Completion::Entity => ("200", envelope_response(description, Some(schema_ref(entity)))),
        Completion::NoContent => (
            "204",
            ResponseBuilder::new().description(description).build(),
        ),
    }
}

/// Adds a resource's operations and schemas.
fn document<R: Repository>(paths: &mut Paths, components: ComponentsBuilder) -> ComponentsBuilder {
    let entity = R::name().into_owned();
    let payload = <R::Payload as ToSchema>::name().into_owned();
    let base = R::BASE_PATH;
    let item = format!("{base}/{{id}}");
    let tag = entity.as_str();
    let singular = R::RESOURCE_NAME_SINGULAR;
    let plural = R::RESOURCE_NAME_PLURAL;
    let bad_request = envelope_response("Invalid input", None);
    let not_found = envelope_response("Not found", None);

    paths.add_path_operation(
        base,
        vec![HttpMethod::Get],
        operation(tag, format!("list_{plural}"), format!("List {plural} a page at a time"))
            .parameters(Some(PageParams::into_params(|| Some(ParameterIn::Query))))
            .response("200", envelope_response("One page", Some(list_of(tag))))
            .response("400", bad_request.clone()),
    );
    paths.add_path_operation(
        &item,
        vec![HttpMethod::Get],
        operation(tag, format!("get_{singular}"), format!("Get one {singular}"))
            .parameter(path_id("id"))
            .response("200", envelope_response("Found", Some(schema_ref(tag))))
            .response("404", not_found.clone()),
    );

    let created = envelope_response("Created", Some(schema_ref(tag)));
    if R::ROUTES.create_under_parent {
        paths.add_path_operation(
            &item,
            vec![HttpMethod::Post],
            operation(tag, format!("create_{singular}"), format!("Create a {singular} under its parent"))
                .parameter(path_id("id"))
                .request_body(Some(json_body(&payload)))
                .response("201", created)
                .response("400", bad_request.clone())
                .response("404", not_found.clone()),
        );
    } else {
        paths.add_path_operation(
            base,
            vec![HttpMethod::Post],
            operation(tag, format!("create_{singular}"), format!("Create a {singular}"))
                .request_body(Some(json_body(&payload)))
                .response("201", created)
                .response("400", bad_request.clone()),
        );
    }

    let (code, updated) = completion_response(R::UPDATE_COMPLETION, "Updated", tag);
    paths.add_path_operation(
        &item,
        vec![HttpMethod::Put],
        operation(tag, format!("update_{singular}"), format!("Replace a {singular}"))
            .parameter(path_id("id"))
            .request_body(Some(json_body(&payload)))
            .response(code, updated)
            .response("400", bad_request.clone())
            .response("404", not_found.clone()),
    );
    let (code, deleted) = completion_response(R::DELETE_COMPLETION, "Deleted", tag);
    paths.add_path_operation(
        &item,
        vec![HttpMethod::Delete],
        operation(tag, format!("delete_{singular}"), format!("Delete a {singular}"))
            .parameter(path_id("id"))
            .response(code, deleted)
            .response("404", not_found),
    );

    if R::ROUTES.filter.is_some() {
        paths.add_path_operation(
            format!("{base}/filter"),
            vec![HttpMethod::Get],
            operation(tag, format!("filter_{plural}"), format!("Filter {plural}"))
                .parameters(Some(R::FilterParams::into_params(|| Some(ParameterIn::Query))))
                .response("200", envelope_response("Every match", Some(list_of(tag))))
                .response("400", bad_request.clone()),
        );
    }
    if R::ROUTES.search.is_some() {
        paths.add_path_operation(
            format!("{base}/search"),
            vec![HttpMethod::Get],
            operation(tag, format!("search_{plural}"), format!("Search {plural} by keyword"))
                .parameters(Some(KeywordParams::into_params(|| Some(ParameterIn::Query))))
                .response("200", envelope_response("Every match", Some(list_of(tag))))
                .response("400", bad_request),
        );
    }

    components.schema_from::<R>().schema_from::<R::Payload>()
}

fn document_upload(paths: &mut Paths, components: ComponentsBuilder) -> ComponentsBuilder {
    let form = ObjectBuilder::new()
        .property(
            "file",
            string_schema().content_media_type("application/octet-stream"),
        )
        .required("file");
    paths.add_path_operation(
        UPLOAD_PATH,
        vec![HttpMethod::Post],
        operation("Upload", "upload_image".to_string(), "Upload an image".to_string())
            .request_body(Some(
                RequestBodyBuilder::new()
                    .content(
                        "multipart/form-data",
                        ContentBuilder::new().schema(Some(form)).build(),
                    )
                    .required(Some(Required::True))
                    .build(),
            ))
            .response(
                "200",
                envelope_response("Stored", Some(schema_ref("UploadedFile"))),
            )
            .response("400", envelope_response("No file uploaded", None)),
    );
    components.schema_from::<UploadedFile>()
}

/// The complete document served at [`DOCS_PATH`].
#[must_use]
pub fn build_openapi() -> OpenApi {
    let mut paths = Paths::new();
    let mut components = ComponentsBuilder::new();
    components = document::<Category>(&mut paths, components);
    components = document::<Customer>(&mut paths, components);
    components = document::<Product>(&mut paths, components);
    components = document::<Order>(&mut paths, components);
    components = document::<OrderItem>(&mut paths, components);
    components = document_upload(&mut paths, components);

    OpenApiBuilder::new()
        .info(
            InfoBuilder::new()
                .title("storecrate")
                .version(env!("CARGO_PKG_VERSION"))
                .description(Some("E-commerce catalog, customer and order API")),
        )
        .paths(paths)
        .components(Some(components.build()))
        .build()
}
