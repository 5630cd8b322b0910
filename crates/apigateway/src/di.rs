use anyhow::{Context, Result};
use shared::{
    abstract_trait::{
        auth::DynAuthService,
        gateway::DynPaymentGateway,
        jwt::DynJwtService,
        lesson::DynLessonQueryRepository,
        payment::DynCheckoutService,
        refresh_token::{
            command::DynRefreshTokenCommandRepository, query::DynRefreshTokenQueryRepository,
        },
        refund::DynRefundService,
        reservation::{
            repository::{DynReservationCommandRepository, DynReservationQueryRepository},
            service::DynReservationService,
        },
        settlement::{repository::DynSettlementRepository, service::DynSettlementService},
        token::DynTokenService,
        user::DynUserQueryRepository,
    },
    config::{ConnectionPool, KakaoPayConfig},
    gateway::KakaoPayClient,
    repository::{
        lesson::LessonQueryRepository,
        refresh_token::{RefreshTokenCommandRepository, RefreshTokenQueryRepository},
        reservation::{ReservationCommandRepository, ReservationQueryRepository},
        settlement::SettlementRepository,
        user::UserQueryRepository,
    },
    service::{
        auth::{AuthService, AuthServiceDeps},
        payment::CheckoutService,
        refund::RefundService,
        reservation::ReservationService,
        settlement::SettlementService,
        token::TokenService,
    },
    utils::{Metrics, Telemetry},
};
use std::sync::Arc;

pub struct DependenciesInjectDeps {
    pub pool: ConnectionPool,
    pub jwt_config: DynJwtService,
    pub kakaopay: KakaoPayConfig,
    pub metrics: Metrics,
}

#[derive(Clone)]
pub struct DependenciesInject {
    pub auth_service: DynAuthService,
    pub checkout_service: DynCheckoutService,
    pub refund_service: DynRefundService,
    pub settlement_service: DynSettlementService,
}

impl std::fmt::Debug for DependenciesInject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependenciesInject")
            .field("auth_service", &"DynAuthService")
            .field("checkout_service", &"DynCheckoutService")
            .field("refund_service", &"DynRefundService")
            .field("settlement_service", &"DynSettlementService")
            .finish()
    }
}

impl DependenciesInject {
    pub fn new(deps: DependenciesInjectDeps) -> Result<Self> {
        let DependenciesInjectDeps {
            pool,
            jwt_config,
            kakaopay,
            metrics,
        } = deps;

        let users = Arc::new(UserQueryRepository::new(pool.clone())) as DynUserQueryRepository;
        let lessons =
            Arc::new(LessonQueryRepository::new(pool.clone())) as DynLessonQueryRepository;
        let reservation_query = Arc::new(ReservationQueryRepository::new(pool.clone()))
            as DynReservationQueryRepository;
        let reservation_command = Arc::new(ReservationCommandRepository::new(pool.clone()))
            as DynReservationCommandRepository;
        let refresh_query = Arc::new(RefreshTokenQueryRepository::new(pool.clone()))
            as DynRefreshTokenQueryRepository;
        let refresh_command = Arc::new(RefreshTokenCommandRepository::new(pool.clone()))
            as DynRefreshTokenCommandRepository;
        let settlement_repo =
            Arc::new(SettlementRepository::new(pool)) as DynSettlementRepository;

        let cid = kakaopay.cid.clone();
        let gateway = Arc::new(
            KakaoPayClient::new(kakaopay, metrics.clone())
                .context("Failed to build Kakao Pay client")?,
        ) as DynPaymentGateway;

        let reservations = Arc::new(ReservationService::new(
            reservation_query,
            reservation_command,
            lessons,
            cid,
        )) as DynReservationService;

        let checkout_service = Arc::new(CheckoutService::new(
            reservations.clone(),
            gateway.clone(),
            Telemetry::new("checkout-service", metrics.clone()),
        )) as DynCheckoutService;

        let refund_service = Arc::new(RefundService::new(
            reservations,
            gateway,
            Telemetry::new("refund-service", metrics.clone()),
        )) as DynRefundService;

        let settlement_service = Arc::new(SettlementService::new(
            settlement_repo,
            Telemetry::new("settlement-service", metrics.clone()),
        )) as DynSettlementService;

        let tokens = Arc::new(TokenService::new(
            jwt_config.clone(),
            refresh_command.clone(),
        )) as DynTokenService;

        let auth_service = Arc::new(AuthService::new(AuthServiceDeps {
            users,
            refresh_query,
            refresh_command,
            jwt: jwt_config,
            tokens,
            telemetry: Telemetry::new("auth-service", metrics),
        })) as DynAuthService;

        Ok(Self {
            auth_service,
            checkout_service,
            refund_service,
            settlement_service,
        })
    }
}
