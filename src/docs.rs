use crate::api::attendance::{AttendanceFilter, AttendanceListResponse, CheckInPayload};
use crate::api::employee::{EmployeeListResponse, EmployeeQuery, EmployeeResponse, SetEmployeeStatus};
use crate::api::holiday::{CreateHoliday, HolidayFilter};
use crate::api::leave_request::{CreateLeave, LeaveFilter, LeaveListResponse, UpsertQuota};
use crate::api::report::{BalanceQuery, MonthlyQuery, RangeQuery, ReportEnvelope};
use crate::model::attendance::AttendanceRecord;
use crate::model::holiday::Holiday;
use crate::model::leave_quota::LeaveQuotaEntry;
use crate::model::leave_request::LeaveRequest;
use crate::report::assembler::{
    DailyReportEntry, LateEmployeeEntry, MonthlyReportEntry, SummaryReport,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Go Absen API",
        version = "1.0.0",
        description = r#"
## Go Absen — attendance and leave management

Backend for daily employee attendance and leave administration.

### Key features
- **Attendance**
  - Daily check-in / check-out in the company's local time zone
- **Leave management**
  - Request leave, approve/reject, monthly quota accounting
- **Holidays**
  - Full-day and half-day company holidays
- **Reports**
  - Range summary, daily and monthly breakdowns, top late employees,
    per-user leave balances

### Security
Endpoints are protected with **JWT Bearer authentication**; administrative
operations require the **Admin** role.

### Response format
- JSON-based RESTful responses
- Report endpoints wrap results in a `{success, data | error}` envelope
"#,
    ),
    paths(
        crate::api::leave_request::leave_list,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::create_leave,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,
        crate::api::leave_request::upsert_quota,

        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::attendance_list,

        crate::api::holiday::create_holiday,
        crate::api::holiday::holiday_list,
        crate::api::holiday::delete_holiday,

        crate::api::employee::list_employees,
        crate::api::employee::set_employee_status,

        crate::api::report::summary,
        crate::api::report::daily,
        crate::api::report::monthly,
        crate::api::report::top_late,
        crate::api::report::leave_balance
    ),
    components(
        schemas(
            AttendanceRecord,
            AttendanceFilter,
            AttendanceListResponse,
            CheckInPayload,
            LeaveRequest,
            LeaveFilter,
            LeaveListResponse,
            CreateLeave,
            UpsertQuota,
            LeaveQuotaEntry,
            Holiday,
            CreateHoliday,
            HolidayFilter,
            EmployeeQuery,
            EmployeeResponse,
            EmployeeListResponse,
            SetEmployeeStatus,
            RangeQuery,
            MonthlyQuery,
            BalanceQuery,
            ReportEnvelope,
            SummaryReport,
            DailyReportEntry,
            MonthlyReportEntry,
            LateEmployeeEntry
        )
    ),
    tags(
        (name = "Attendance", description = "Attendance management APIs"),
        (name = "Leave", description = "Leave management APIs"),
        (name = "Holiday", description = "Holiday management APIs"),
        (name = "Employee", description = "Employee management APIs"),
        (name = "Reports", description = "Attendance and leave reporting APIs"),
    )
)]
pub struct ApiDoc;
