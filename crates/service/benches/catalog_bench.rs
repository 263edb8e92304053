use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use service::auth::domain::RegisterInput;
use service::auth::repository::mock::MockAuthRepository;
use service::auth::{AuthConfig, AuthService};
use service::cache::MokaCache;
use service::catalog::domain::{CategoryInput, ServiceInput};
use service::catalog::repository::mock::MockCatalogRepository;
use service::catalog::CatalogService;

fn bench_catalog_hit(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let svc = CatalogService::new(Arc::new(MockCatalogRepository::default()), Arc::new(MokaCache::new(1_000)));

    // seed outside of the measured loop and warm the cache
    rt.block_on(async {
        let cat = svc
            .save_category(None, CategoryInput { name: "Development".into(), slug: None, description: String::new() })
            .await
            .unwrap();
        for i in 0..20 {
            svc.save_service(
                None,
                ServiceInput {
                    title: format!("Service {i}"),
                    category_id: cat.id,
                    description: "Bench".into(),
                    short_description: "Bench".into(),
                    is_featured: i % 2 == 0,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        }
        svc.list_featured().await.unwrap();
        svc.get_service("service-7").await.unwrap();
    });

    c.bench_function("catalog_featured_cache_hit", |b| {
        b.iter(|| rt.block_on(svc.list_featured()).unwrap());
    });
    c.bench_function("catalog_service_cache_hit", |b| {
        b.iter(|| rt.block_on(svc.get_service("service-7")).unwrap());
    });
}

fn bench_token_validation(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let svc = AuthService::new(Arc::new(MockAuthRepository::default()), AuthConfig::default());
    let reg = rt
        .block_on(svc.register(RegisterInput {
            username: "bench".into(),
            email: "bench@example.com".into(),
            password: "Benchmark1".into(),
            first_name: String::new(),
            last_name: String::new(),
        }))
        .unwrap();

    c.bench_function("auth_token_authenticate", |b| {
        b.iter(|| rt.block_on(svc.authenticate(&reg.token)).unwrap());
    });
}

criterion_group!(benches, bench_catalog_hit, bench_token_validation);
criterion_main!(benches);
