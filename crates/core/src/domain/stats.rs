/// Platform-wide record counts taken from a single store snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlatformStats {
    pub total_users: u64,
    pub admin_users: u64,
    pub company_users: u64,
    pub student_users: u64,
    pub total_companies: u64,
    pub total_challenges: u64,
    pub total_responses: u64,
    pub total_evaluations: u64,
}
