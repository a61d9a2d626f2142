//! Two-signal readiness latch.

/// Combines an "attribute" signal and a "view ready" signal into a trigger that fires
/// exactly once.
///
/// The attribute side is armed by the first change that carries a module name and is
/// never re-armed; the view side is armed by the first view-ready notification. The
/// trigger fires on whichever call completes the pair and never again, regardless of
/// further notifications on either side.
///
/// ```
/// use lazy_link::Readiness ;
///
/// let mut readiness = Readiness::new();
/// assert!( !readiness.view_initialised() );
/// assert!( readiness.attribute_changed( Some( "lazy/bar#BarModule" )));
/// assert!( !readiness.attribute_changed( Some( "lazy/foo#FooModule" )));
/// assert!( readiness.has_fired() );
/// ```
#[derive( Debug, Clone, Copy, Default, PartialEq, Eq )]
pub struct Readiness {
	attribute: bool,
	view_ready: bool,
	fired: bool,
}

impl Readiness {

	pub fn new() -> Self { Self::default() }

	/// Records an attribute change carrying `module_name`. Empty names do not arm the signal.
	///
	/// Returns `true` if this call fires the trigger.
	pub fn attribute_changed( &mut self, module_name: Option<&str> ) -> bool {
		if !self.attribute && module_name.is_some_and(| name | !name.is_empty() ) {
			self.attribute = true ;
		}
		self.try_fire()
	}

	/// Records that the host view finished initialising.
	///
	/// Returns `true` if this call fires the trigger.
	pub fn view_initialised( &mut self ) -> bool {
		self.view_ready = true ;
		self.try_fire()
	}

	#[inline] pub fn has_attribute( &self ) -> bool { self.attribute }
	#[inline] pub fn is_view_ready( &self ) -> bool { self.view_ready }
	#[inline] pub fn has_fired( &self ) -> bool { self.fired }
	/// Whether exactly one of the two signals has been seen.
	#[inline] pub fn is_partial( &self ) -> bool { self.attribute != self.view_ready }

	fn try_fire( &mut self ) -> bool {
		match !self.fired && self.attribute && self.view_ready {
			true => { self.fired = true ; true },
			false => false,
		}
	}

}
