use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

// Status strings are stored UPPERCASE; they are the wire format the rest
// of the product already speaks.

str_enum!(IntakeStatus {
    Taken => "TAKEN",
    Missed => "MISSED",
    Late => "LATE",
    Skipped => "SKIPPED",
});

str_enum!(ReminderStatus {
    Pending => "PENDING",
    Done => "DONE",
    Cancelled => "CANCELLED",
});

str_enum!(AppointmentStatus {
    Scheduled => "SCHEDULED",
    Completed => "COMPLETED",
    Cancelled => "CANCELLED",
    Missed => "MISSED",
});

str_enum!(UserRole {
    Admin => "ADMIN",
    Doctor => "DOCTOR",
    Caregiver => "CAREGIVER",
    Family => "FAMILY",
    Senior => "SENIOR",
});

str_enum!(MembershipRole {
    SelfMember => "SELF",
    Doctor => "DOCTOR",
    Nurse => "NURSE",
    Caregiver => "CAREGIVER",
    PrimaryCaregiver => "PRIMARY_CAREGIVER",
    Family => "FAMILY",
    Other => "OTHER",
});
