// self
use fusoxy::{
	config::GatewayConfig,
	error::Error,
	gateway::{FuseResourceResponse, ReqwestGateway, RemoteResourceResponse},
	http::{HeaderValue, Method, header::AUTHORIZATION},
	policy::{
		BasicAuthCredentials, FusiblePolicy, InboundRequest, PolicyCategory, PolicyViolation,
		RemoteResourcePolicy, RequestPolicy,
	},
	token::TokenOrigin,
	url::Url,
};

const TARGET: &str = "https://example.com/a?x=1";

fn build_gateway() -> ReqwestGateway {
	ReqwestGateway::new(GatewayConfig::default()).expect("Default gateway should build.")
}

fn inbound(method: Method, path_and_query: &str) -> InboundRequest {
	let url = Url::parse("http://gateway.test/")
		.and_then(|base| base.join(path_and_query))
		.expect("Inbound request fixture should parse.");

	InboundRequest::new(method, url)
}

fn allow_methods(methods: &[&str]) -> RemoteResourcePolicy {
	RemoteResourcePolicy {
		request: None,
		fusible: Some(FusiblePolicy {
			allowed_methods: methods.iter().map(|method| method.to_string()).collect(),
			..Default::default()
		}),
	}
}

#[tokio::test]
async fn issuance_is_gated_by_request_policy() {
	let gateway = build_gateway();
	let policy = RemoteResourcePolicy {
		request: Some(RequestPolicy {
			required_query_params: vec!["x".into()],
			..Default::default()
		}),
		fusible: None,
	};
	let resource = gateway
		.register(TARGET, Some(policy), false)
		.await
		.expect("Registering the gated resource should succeed.");
	let path = format!("/proxy/{}", resource.id);
	let err = gateway
		.issue(&resource.id, &inbound(Method::GET, &path))
		.await
		.expect_err("Issuance without `x` should be rejected.");

	assert!(matches!(
		err,
		Error::PolicyValidationFailed(PolicyViolation {
			category: PolicyCategory::RequiredQueryParams
		})
	));

	let token = gateway
		.issue(&resource.id, &inbound(Method::GET, &format!("{path}?x=1")))
		.await
		.expect("Issuance with `x=1` should succeed.");

	assert_eq!(token.origin, TokenOrigin::Registered);
	assert_eq!(token.resource_id(), &resource.id);
	assert_eq!(token.target.url.decode(), TARGET);
}

#[tokio::test]
async fn issuance_checks_basic_auth_credentials() {
	let gateway = build_gateway();
	let credentials = BasicAuthCredentials::new("admin", "password");
	let policy = RemoteResourcePolicy {
		request: Some(RequestPolicy {
			basic_auth: Some(credentials.clone()),
			..Default::default()
		}),
		fusible: None,
	};
	let resource = gateway
		.register(TARGET, Some(policy), false)
		.await
		.expect("Registering the protected resource should succeed.");
	let path = format!("/proxy/{}", resource.id);
	let wrong = inbound(Method::GET, &path)
		.with_header(AUTHORIZATION, HeaderValue::from_static("Basic YWRtaW46bm9wZQ=="));

	assert!(matches!(
		gateway.issue(&resource.id, &wrong).await,
		Err(Error::PolicyValidationFailed(PolicyViolation {
			category: PolicyCategory::BasicAuth
		}))
	));

	let right = inbound(Method::GET, &path).with_header(
		AUTHORIZATION,
		HeaderValue::from_str(&credentials.header_value())
			.expect("Encoded credentials should form a valid header value."),
	);

	gateway.issue(&resource.id, &right).await.expect("Matching credentials should issue.");
}

#[tokio::test]
async fn override_does_not_reach_minted_tokens() {
	let gateway = build_gateway();
	let original = gateway
		.register(TARGET, Some(allow_methods(&["POST"])), false)
		.await
		.expect("Initial registration should succeed.");
	let path = format!("/proxy/{}", original.id);
	let before = gateway
		.issue(&original.id, &inbound(Method::GET, &path))
		.await
		.expect("Issuing before the override should succeed.");
	let ignored = gateway
		.register(TARGET, Some(allow_methods(&["PUT"])), false)
		.await
		.expect("Registration without override should succeed.");

	assert_eq!(ignored, original);

	let replaced = gateway
		.register(TARGET, Some(allow_methods(&["GET"])), true)
		.await
		.expect("Registration with override should succeed.");

	assert_eq!(replaced.id, original.id);
	assert_eq!(replaced.policy, Some(allow_methods(&["GET"])));

	let after = gateway
		.issue(&original.id, &inbound(Method::GET, &path))
		.await
		.expect("Issuing after the override should succeed.");

	assert_eq!(before.policy, allow_methods(&["POST"]).fusible);
	assert_eq!(after.policy, allow_methods(&["GET"]).fusible);
	assert_ne!(before.id, after.id);
}

#[tokio::test]
async fn envelopes_link_to_the_next_route() {
	let gateway = build_gateway();
	let resource =
		gateway.register(TARGET, None, false).await.expect("Registration should succeed.");
	let registered = RemoteResourceResponse::new(&gateway.config, &resource);

	assert_eq!(registered.proxy_ressource_infos.url, format!("/proxy/{}", resource.id));

	let token = gateway
		.issue(&resource.id, &inbound(Method::GET, &registered.proxy_ressource_infos.url))
		.await
		.expect("Issuing an unguarded resource should succeed.");
	let issued = FuseResourceResponse::new(&gateway.config, &token);

	assert_eq!(issued.fuse_ressource_infos.id, token.id.to_string());
	assert_eq!(issued.fuse_ressource_infos.url, format!("/fuse/{}", token.id));
}
