
mod accessibility_test;
mod circularity_test;
mod generics_test;
mod implicit_members_test;
mod inheritance_test;
mod overrides_test;
