//! Macro that turns frame shape declarations into checked batch wrappers.

use arrow::datatypes::Schema;

use crate::role::ColumnKind;

/// Column contract runtime check.
pub fn __check_columns(
    frame_name: &str,
    columns: &[(&str, ColumnKind)],
    schema: &Schema,
) -> anyhow::Result<()> {
    for (name, kind) in columns {
        let field = schema.field_with_name(name).map_err(|_| {
            anyhow::anyhow!("frame {} is missing column {}", frame_name, name)
        })?;
        if !kind.accepts(field.data_type()) {
            anyhow::bail!(
                "frame {}: column {} has type {:?}, expected {:?}",
                frame_name,
                name,
                field.data_type(),
                kind
            );
        }
    }
    Ok(())
}

/// Map DSL token -> column kind.
#[macro_export]
macro_rules! __kind {
    ( Number ) => { $crate::role::ColumnKind::Number };
    ( Text ) => { $crate::role::ColumnKind::Text };
}

/// Declarative frame shapes. Generates checked batch wrappers.
#[macro_export]
macro_rules! define_frames {
    (
        $(
            frame $Name:ident {
                role: $role:path,
                columns: {
                    $( $cname:ident : $kind:ident ),* $(,)?
                }
            }
        ),* $(,)?
    ) => {
        $(
            /// Checked wrapper for a `$Name` shaped batch.
            #[derive(Clone, Debug)]
            pub struct $Name {
                inner: ::std::sync::Arc<::arrow::record_batch::RecordBatch>,
            }

            impl $Name {
                /// Role this frame plays in a render pass.
                pub const ROLE: $crate::role::FrameRole = $role;

                /// Declared columns and their kinds.
                pub const COLUMNS: &'static [(&'static str, $crate::role::ColumnKind)] = &[
                    $( (stringify!($cname), $crate::__kind!($kind)) ),*
                ];

                /// Wrap a batch after checking the column contract.
                pub fn new(inner: ::std::sync::Arc<::arrow::record_batch::RecordBatch>) -> anyhow::Result<Self> {
                    $crate::macros::__check_columns(
                        stringify!($Name),
                        Self::COLUMNS,
                        inner.schema().as_ref(),
                    )?;
                    Ok(Self { inner })
                }

                /// Underlying Arrow batch.
                pub fn inner(&self) -> &::std::sync::Arc<::arrow::record_batch::RecordBatch> {
                    &self.inner
                }
            }
        )*
    };
}
