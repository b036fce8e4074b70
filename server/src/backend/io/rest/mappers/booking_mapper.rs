use crate::backend::domain::commands::bookings::{BookingListQuery, BookingPage, DEFAULT_PAGE_SIZE};
use crate::backend::domain::models::booking::{
    BookedResource, Booking as DomainBooking, BookingId, BookingStatus as DomainBookingStatus,
    Guest as DomainGuest, ResourceKind,
};
use crate::backend::domain::models::payment::PaymentRecord as DomainPaymentRecord;
use crate::backend::domain::models::revenue::RevenueSummary;
use crate::backend::domain::money::format_amount;
use crate::backend::domain::payment_ledger::LedgerSummary;
use shared::{
    AreaSummary, Booking as SharedBooking, BookingKind, BookingListRequest, BookingListResponse,
    BookingStatus as SharedBookingStatus, Guest as SharedGuest, LedgerSummaryResponse,
    PaginationInfo, PaymentHistoryResponse, PaymentRecord as SharedPaymentRecord,
    RevenueSummaryResponse, RoomSummary, StatusCount,
};

pub struct BookingMapper;

impl BookingMapper {
    pub fn to_dto(domain: DomainBooking) -> SharedBooking {
        let is_venue_booking = domain.is_venue_booking();
        let allowed_transitions = domain
            .status
            .allowed_targets()
            .into_iter()
            .map(Self::to_dto_status)
            .collect();
        let BookedResource {
            kind,
            id,
            name,
            discounted_price,
        } = domain.resource;
        let (room, area) = match kind {
            ResourceKind::Room => (
                Some(RoomSummary {
                    id,
                    name,
                    discounted_price,
                }),
                None,
            ),
            ResourceKind::Area => (
                None,
                Some(AreaSummary {
                    id,
                    name,
                    discounted_price,
                }),
            ),
        };

        SharedBooking {
            id: domain.id,
            status: Self::to_dto_status(domain.status),
            total_price: domain.total_price,
            down_payment: domain.down_payment,
            total_amount_paid: domain.total_amount_paid,
            check_in_date: domain.check_in_date,
            check_out_date: domain.check_out_date,
            is_venue_booking,
            room,
            area,
            user: SharedGuest {
                name: domain.guest.name,
                email: domain.guest.email,
                is_verified: domain.guest.is_verified,
            },
            reason: domain.reason,
            allowed_transitions,
        }
    }

    /// `None` when the DTO names neither a room nor an area
    pub fn to_domain(dto: SharedBooking) -> Option<DomainBooking> {
        let resource = match (dto.room, dto.area) {
            (Some(room), None) => BookedResource {
                kind: ResourceKind::Room,
                id: room.id,
                name: room.name,
                discounted_price: room.discounted_price,
            },
            (None, Some(area)) => BookedResource {
                kind: ResourceKind::Area,
                id: area.id,
                name: area.name,
                discounted_price: area.discounted_price,
            },
            _ => return None,
        };

        Some(DomainBooking {
            id: dto.id,
            status: Self::to_domain_status(dto.status),
            total_price: dto.total_price,
            down_payment: dto.down_payment,
            total_amount_paid: dto.total_amount_paid,
            check_in_date: dto.check_in_date,
            check_out_date: dto.check_out_date,
            resource,
            guest: DomainGuest {
                name: dto.user.name,
                email: dto.user.email,
                is_verified: dto.user.is_verified,
            },
            reason: dto.reason,
        })
    }

    pub fn to_domain_status(dto_status: SharedBookingStatus) -> DomainBookingStatus {
        match dto_status {
            SharedBookingStatus::Pending => DomainBookingStatus::Pending,
            SharedBookingStatus::Reserved => DomainBookingStatus::Reserved,
            SharedBookingStatus::CheckedIn => DomainBookingStatus::CheckedIn,
            SharedBookingStatus::CheckedOut => DomainBookingStatus::CheckedOut,
            SharedBookingStatus::Cancelled => DomainBookingStatus::Cancelled,
            SharedBookingStatus::Rejected => DomainBookingStatus::Rejected,
            SharedBookingStatus::NoShow => DomainBookingStatus::NoShow,
        }
    }

    pub fn to_dto_status(domain_status: DomainBookingStatus) -> SharedBookingStatus {
        match domain_status {
            DomainBookingStatus::Pending => SharedBookingStatus::Pending,
            DomainBookingStatus::Reserved => SharedBookingStatus::Reserved,
            DomainBookingStatus::CheckedIn => SharedBookingStatus::CheckedIn,
            DomainBookingStatus::CheckedOut => SharedBookingStatus::CheckedOut,
            DomainBookingStatus::Cancelled => SharedBookingStatus::Cancelled,
            DomainBookingStatus::Rejected => SharedBookingStatus::Rejected,
            DomainBookingStatus::NoShow => SharedBookingStatus::NoShow,
        }
    }

    fn to_domain_kind(kind: BookingKind) -> ResourceKind {
        match kind {
            BookingKind::Room => ResourceKind::Room,
            BookingKind::Area => ResourceKind::Area,
        }
    }

    pub fn to_list_query(request: BookingListRequest) -> BookingListQuery {
        BookingListQuery {
            status: request.status.map(Self::to_domain_status),
            kind: request.kind.map(Self::to_domain_kind),
            search: request.search,
            page: request.page.unwrap_or(1),
            page_size: request.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        }
        .normalized()
    }

    pub fn to_list_response(page: BookingPage) -> BookingListResponse {
        BookingListResponse {
            pagination: PaginationInfo {
                page: page.page,
                page_size: page.page_size,
                has_more: page.has_more,
            },
            bookings: page.bookings.into_iter().map(Self::to_dto).collect(),
        }
    }

    pub fn to_ledger_response(booking_id: i64, ledger: LedgerSummary) -> LedgerSummaryResponse {
        LedgerSummaryResponse {
            booking_id,
            total_price: ledger.total_price,
            required_down_payment: ledger.required_down_payment,
            down_payment: ledger.down_payment,
            total_amount_paid: ledger.total_amount_paid,
            remaining_balance: ledger.remaining_balance,
            is_fully_paid: ledger.is_fully_paid,
            formatted_remaining_balance: format_amount(ledger.remaining_balance),
        }
    }

    pub fn to_payment_history_response(
        booking_id: BookingId,
        payments: Vec<DomainPaymentRecord>,
    ) -> PaymentHistoryResponse {
        PaymentHistoryResponse {
            booking_id,
            payments: payments
                .into_iter()
                .map(|payment| SharedPaymentRecord {
                    id: payment.id,
                    amount: payment.amount,
                    formatted_amount: format_amount(payment.amount),
                    recorded_at: payment.recorded_at,
                })
                .collect(),
        }
    }

    pub fn to_revenue_response(summary: RevenueSummary) -> RevenueSummaryResponse {
        RevenueSummaryResponse {
            from: summary.from,
            to: summary.to,
            booking_count: summary.booking_count,
            collected_revenue: summary.collected_revenue,
            outstanding_balance: summary.outstanding_balance,
            room_revenue: summary.room_revenue,
            area_revenue: summary.area_revenue,
            status_counts: summary
                .status_counts
                .into_iter()
                .map(|(status, count)| StatusCount {
                    status: Self::to_dto_status(status),
                    count,
                })
                .collect(),
        }
    }
}
